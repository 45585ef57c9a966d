//! News items, attached to a symbol.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct News {
    #[serde(rename = "newsID")]
    pub news_id: i64,
    pub headline: String,
    pub body: String,
    pub link: String,
    #[serde(rename = "symbolID")]
    pub symbol_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNews {
    pub headline: String,
    pub body: String,
    pub link: String,
    pub symbol_id: i64,
}

impl NewNews {
    pub fn with_id(self, news_id: i64) -> News {
        News {
            news_id,
            headline: self.headline,
            body: self.body,
            link: self.link,
            symbol_id: self.symbol_id,
        }
    }
}
