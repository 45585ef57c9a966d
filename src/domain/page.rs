//! Offset/limit window for list endpoints.

/// Largest (and default) number of rows a list request returns.
pub const MAX_COUNT: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub start: i64,
    pub count: i64,
}

impl Page {
    /// `count` outside `1..=MAX_COUNT` becomes `MAX_COUNT`; negative `start` becomes 0.
    pub fn new(start: i64, count: i64) -> Self {
        let count = if (1..=MAX_COUNT).contains(&count) {
            count
        } else {
            MAX_COUNT
        };
        Self {
            start: start.max(0),
            count,
        }
    }

    /// Build a page from raw query values. Absent or unparsable values count as 0.
    pub fn from_query(start: Option<&str>, count: Option<&str>) -> Self {
        let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(0);
        Self::new(parse(start), parse(count))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, MAX_COUNT)
    }
}
