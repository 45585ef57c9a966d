//! Watch entries linking a user to a symbol.
//!
//! A user stops watching a symbol by clearing `is_watched`; the row itself
//! is kept so the relation can be inspected later.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    #[serde(rename = "portfolioID")]
    pub portfolio_id: i64,
    #[serde(rename = "isWatched", deserialize_with = "super::flag::deserialize")]
    pub is_watched: bool,
    #[serde(rename = "symbolID")]
    pub symbol_id: i64,
    #[serde(rename = "userID")]
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPortfolioEntry {
    pub is_watched: bool,
    pub symbol_id: i64,
    pub user_id: i64,
}

impl NewPortfolioEntry {
    pub fn with_id(self, portfolio_id: i64) -> PortfolioEntry {
        PortfolioEntry {
            portfolio_id,
            is_watched: self.is_watched,
            symbol_id: self.symbol_id,
            user_id: self.user_id,
        }
    }
}

/// Body of the add/remove watch requests. The symbol comes from the path.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WatchRequest {
    #[serde(rename = "portfolioID", alias = "portfolioid")]
    pub portfolio_id: i64,
    #[serde(
        rename = "isWatched",
        alias = "iswatched",
        deserialize_with = "super::flag::deserialize"
    )]
    pub is_watched: bool,
    #[serde(rename = "userID", alias = "userid")]
    pub user_id: i64,
}

impl Default for WatchRequest {
    fn default() -> Self {
        Self {
            portfolio_id: 0,
            is_watched: true,
            user_id: 0,
        }
    }
}

impl WatchRequest {
    pub fn into_new_entry(self, symbol_id: i64) -> NewPortfolioEntry {
        NewPortfolioEntry {
            is_watched: self.is_watched,
            symbol_id,
            user_id: self.user_id,
        }
    }

    /// The relation as it reads after the watch flag has been cleared.
    pub fn into_unwatched(self, symbol_id: i64) -> PortfolioEntry {
        PortfolioEntry {
            portfolio_id: self.portfolio_id,
            is_watched: false,
            symbol_id,
            user_id: self.user_id,
        }
    }
}
