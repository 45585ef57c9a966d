//! Data access port trait.
//!
//! One method per (entity, operation). Single-row lookups report zero
//! matches as [`TradesimError::NotFound`]; list methods return an empty
//! vector instead.

use crate::domain::error::TradesimError;
use crate::domain::news::{NewNews, News};
use crate::domain::page::Page;
use crate::domain::portfolio::{NewPortfolioEntry, PortfolioEntry};
use crate::domain::product::{Product, ProductInput};
use crate::domain::symbol::{NewSymbol, Symbol};
use crate::domain::user::{NewUser, User};

pub trait DataPort {
    fn get_product(&self, id: i64) -> Result<Product, TradesimError>;

    fn list_products(&self, page: Page) -> Result<Vec<Product>, TradesimError>;

    /// Insert and return the row with its generated id, in one statement.
    fn create_product(&self, input: ProductInput) -> Result<Product, TradesimError>;

    /// Overwrite every field of the row with `product.id`. Missing rows are not an error.
    fn update_product(&self, product: &Product) -> Result<(), TradesimError>;

    /// Deleting a missing row is not an error.
    fn delete_product(&self, id: i64) -> Result<(), TradesimError>;

    fn create_user(&self, input: NewUser) -> Result<User, TradesimError>;

    fn list_symbols(&self) -> Result<Vec<Symbol>, TradesimError>;

    fn create_symbol(&self, input: NewSymbol) -> Result<Symbol, TradesimError>;

    /// Insert every row in one transaction; on error nothing is kept.
    fn create_symbols(&self, rows: Vec<NewSymbol>) -> Result<Vec<Symbol>, TradesimError>;

    fn get_portfolio(&self, user_id: i64) -> Result<Vec<PortfolioEntry>, TradesimError>;

    fn create_portfolio_entry(
        &self,
        input: NewPortfolioEntry,
    ) -> Result<PortfolioEntry, TradesimError>;

    /// Clear the watch flag on every entry for `(symbol_id, user_id)`.
    fn set_watched_false(&self, symbol_id: i64, user_id: i64) -> Result<(), TradesimError>;

    /// News for the symbols in a user's portfolio.
    fn get_news(&self, user_id: i64, page: Page) -> Result<Vec<News>, TradesimError>;

    fn create_news(&self, input: NewNews) -> Result<News, TradesimError>;

    /// Insert every row in one transaction; on error nothing is kept.
    fn create_news_items(&self, rows: Vec<NewNews>) -> Result<Vec<News>, TradesimError>;
}
