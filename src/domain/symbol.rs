//! Ticker symbols. Reference data: loaded by import, never written over HTTP.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    #[serde(rename = "symbolID")]
    pub symbol_id: i64,
    #[serde(rename = "isNASDAQ")]
    pub is_nasdaq: bool,
    #[serde(rename = "isSP500")]
    pub is_sp500: bool,
    #[serde(rename = "isDOW")]
    pub is_dow: bool,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSymbol {
    pub is_nasdaq: bool,
    pub is_sp500: bool,
    pub is_dow: bool,
    pub symbol: String,
}

impl NewSymbol {
    pub fn with_id(self, symbol_id: i64) -> Symbol {
        Symbol {
            symbol_id,
            is_nasdaq: self.is_nasdaq,
            is_sp500: self.is_sp500,
            is_dow: self.is_dow,
            symbol: self.symbol,
        }
    }
}
