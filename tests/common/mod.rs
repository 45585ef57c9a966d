#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use tradesim::adapters::sqlite_adapter::SqliteAdapter;
use tradesim::adapters::web::{AppState, build_router};
use tradesim::domain::error::TradesimError;
use tradesim::domain::news::{NewNews, News};
use tradesim::domain::page::Page;
use tradesim::domain::portfolio::{NewPortfolioEntry, PortfolioEntry};
use tradesim::domain::product::{Product, ProductInput};
use tradesim::domain::symbol::{NewSymbol, Symbol};
use tradesim::domain::user::{NewUser, User};
use tradesim::ports::data_port::DataPort;

pub struct TestApp {
    pub store: Arc<SqliteAdapter>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(SqliteAdapter::in_memory().unwrap());
        store.initialize_schema().unwrap();
        let router = build_router(AppState {
            data_port: store.clone(),
        });
        Self { store, router }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let (status, text) = self.send(method, uri, body).await;
        let value = serde_json::from_str(&text)
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {text}"));
        (status, value)
    }

    pub fn add_products(&self, count: usize) {
        for i in 0..count {
            self.store
                .create_product(ProductInput {
                    name: format!("Product {i}"),
                    price: (i as f64 + 1.0) * 10.0,
                })
                .unwrap();
        }
    }

    pub fn add_user(&self) -> User {
        self.store
            .create_user(NewUser {
                display_name: "test user".into(),
                idcs_id: "01".into(),
            })
            .unwrap()
    }

    /// ORCL (id 1) and SAN (id 2).
    pub fn add_symbols(&self) {
        for (ticker, nasdaq, sp500, dow) in [("ORCL", true, true, true), ("SAN", false, true, false)] {
            self.store
                .create_symbol(NewSymbol {
                    is_nasdaq: nasdaq,
                    is_sp500: sp500,
                    is_dow: dow,
                    symbol: ticker.into(),
                })
                .unwrap();
        }
    }

    /// User 1 watches symbols 1 and 2.
    pub fn add_two_portfolio(&self) {
        for symbol_id in [1, 2] {
            self.store
                .create_portfolio_entry(NewPortfolioEntry {
                    is_watched: true,
                    symbol_id,
                    user_id: 1,
                })
                .unwrap();
        }
    }

    /// Two items for symbol 1, one for symbol 2.
    pub fn add_three_news(&self) {
        for (n, symbol_id) in [(1, 1), (2, 2), (3, 1)] {
            self.store
                .create_news(NewNews {
                    headline: format!("headline test {n}"),
                    body: format!("body test {n}"),
                    link: "www.linkTest.com".into(),
                    symbol_id,
                })
                .unwrap();
        }
    }
}

/// Store whose every operation fails like a lost database connection.
pub struct FailingDataPort;

fn down() -> TradesimError {
    TradesimError::Database {
        reason: "connection refused".into(),
    }
}

impl DataPort for FailingDataPort {
    fn get_product(&self, _id: i64) -> Result<Product, TradesimError> {
        Err(down())
    }
    fn list_products(&self, _page: Page) -> Result<Vec<Product>, TradesimError> {
        Err(down())
    }
    fn create_product(&self, _input: ProductInput) -> Result<Product, TradesimError> {
        Err(down())
    }
    fn update_product(&self, _product: &Product) -> Result<(), TradesimError> {
        Err(down())
    }
    fn delete_product(&self, _id: i64) -> Result<(), TradesimError> {
        Err(down())
    }
    fn create_user(&self, _input: NewUser) -> Result<User, TradesimError> {
        Err(down())
    }
    fn list_symbols(&self) -> Result<Vec<Symbol>, TradesimError> {
        Err(down())
    }
    fn create_symbol(&self, _input: NewSymbol) -> Result<Symbol, TradesimError> {
        Err(down())
    }
    fn create_symbols(&self, _rows: Vec<NewSymbol>) -> Result<Vec<Symbol>, TradesimError> {
        Err(down())
    }
    fn get_portfolio(&self, _user_id: i64) -> Result<Vec<PortfolioEntry>, TradesimError> {
        Err(down())
    }
    fn create_portfolio_entry(
        &self,
        _input: NewPortfolioEntry,
    ) -> Result<PortfolioEntry, TradesimError> {
        Err(down())
    }
    fn set_watched_false(&self, _symbol_id: i64, _user_id: i64) -> Result<(), TradesimError> {
        Err(down())
    }
    fn get_news(&self, _user_id: i64, _page: Page) -> Result<Vec<News>, TradesimError> {
        Err(down())
    }
    fn create_news(&self, _input: NewNews) -> Result<News, TradesimError> {
        Err(down())
    }
    fn create_news_items(&self, _rows: Vec<NewNews>) -> Result<Vec<News>, TradesimError> {
        Err(down())
    }
}

pub fn failing_router() -> Router {
    build_router(AppState {
        data_port: Arc::new(FailingDataPort),
    })
}

pub async fn send_to(router: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}
