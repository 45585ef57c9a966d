//! Configuration access port trait.

use crate::domain::error::TradesimError;

pub const DEFAULT_POOL_SIZE: i64 = 4;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;

    /// Like [`get_string`](Self::get_string), but a missing or blank value is an error.
    fn require_string(&self, section: &str, key: &str) -> Result<String, TradesimError> {
        self.get_string(section, key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| TradesimError::ConfigMissing {
                section: section.into(),
                key: key.into(),
            })
    }

    /// `[section] pool_size`, defaulting to [`DEFAULT_POOL_SIZE`]. Zero,
    /// negative and values past `u32::MAX` are rejected.
    fn pool_size(&self, section: &str) -> Result<u32, TradesimError> {
        let raw = self.get_int(section, "pool_size", DEFAULT_POOL_SIZE);
        u32::try_from(raw)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| TradesimError::ConfigInvalid {
                section: section.into(),
                key: "pool_size".into(),
                reason: format!("{raw} is outside 1..={}", u32::MAX),
            })
    }
}
