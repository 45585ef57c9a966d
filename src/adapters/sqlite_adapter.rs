//! SQLite store.

use crate::domain::error::TradesimError;
use crate::domain::news::{NewNews, News};
use crate::domain::page::Page;
use crate::domain::portfolio::{NewPortfolioEntry, PortfolioEntry};
use crate::domain::product::{Product, ProductInput};
use crate::domain::symbol::{NewSymbol, Symbol};
use crate::domain::user::{NewUser, User};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use chrono::Utc;
use log::info;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Row, params};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        price REAL NOT NULL
    );
    CREATE TABLE IF NOT EXISTS users (
        user_id INTEGER PRIMARY KEY AUTOINCREMENT,
        display_name TEXT NOT NULL,
        created_on TEXT NOT NULL,
        idcs_id TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS symbol (
        symbol_id INTEGER PRIMARY KEY AUTOINCREMENT,
        is_nasdaq INTEGER NOT NULL,
        is_sp500 INTEGER NOT NULL,
        is_dow INTEGER NOT NULL,
        symbol TEXT NOT NULL CHECK (length(symbol) > 0)
    );
    CREATE TABLE IF NOT EXISTS portfolio (
        portfolio_id INTEGER PRIMARY KEY AUTOINCREMENT,
        is_watched INTEGER NOT NULL,
        symbol_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_portfolio_user ON portfolio(user_id);
    CREATE TABLE IF NOT EXISTS news (
        news_id INTEGER PRIMARY KEY AUTOINCREMENT,
        headline TEXT NOT NULL,
        body TEXT NOT NULL,
        link TEXT NOT NULL,
        symbol_id INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_news_symbol ON news(symbol_id);";

const INSERT_SYMBOL: &str =
    "INSERT INTO symbol (is_nasdaq, is_sp500, is_dow, symbol) VALUES (?1, ?2, ?3, ?4)
     RETURNING symbol_id";

const INSERT_NEWS: &str = "INSERT INTO news (headline, body, link, symbol_id) VALUES (?1, ?2, ?3, ?4)
     RETURNING news_id";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_err(e: r2d2::Error) -> TradesimError {
    TradesimError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> TradesimError {
    TradesimError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
    })
}

fn portfolio_from_row(row: &Row<'_>) -> rusqlite::Result<PortfolioEntry> {
    Ok(PortfolioEntry {
        portfolio_id: row.get(0)?,
        is_watched: row.get(1)?,
        symbol_id: row.get(2)?,
        user_id: row.get(3)?,
    })
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TradesimError> {
        let db_path = config.require_string("sqlite", "path")?;
        let pool_size = config.pool_size("sqlite")?;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_err)?;

        info!("opened sqlite database {db_path} (pool size {pool_size})");
        Ok(Self { pool })
    }

    /// Single-connection pool over a private in-memory database.
    pub fn in_memory() -> Result<Self, TradesimError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, TradesimError> {
        self.pool.get().map_err(pool_err)
    }

    pub fn initialize_schema(&self) -> Result<(), TradesimError> {
        self.conn()?.execute_batch(SCHEMA).map_err(query_err)
    }

    /// Delete every row and restart all id sequences at 1.
    pub fn clear_tables(&self) -> Result<(), TradesimError> {
        self.conn()?
            .execute_batch(
                "DELETE FROM products;
                 DELETE FROM users;
                 DELETE FROM symbol;
                 DELETE FROM portfolio;
                 DELETE FROM news;
                 DELETE FROM sqlite_sequence;",
            )
            .map_err(query_err)
    }

    fn query_all<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        map: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>, TradesimError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).map_err(query_err)?;
        let rows = stmt.query_map(params, map).map_err(query_err)?;
        rows.collect::<rusqlite::Result<Vec<T>>>().map_err(query_err)
    }
}

impl DataPort for SqliteAdapter {
    fn get_product(&self, id: i64) -> Result<Product, TradesimError> {
        self.conn()?
            .query_row(
                "SELECT id, name, price FROM products WHERE id = ?1",
                params![id],
                product_from_row,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => {
                    TradesimError::NotFound { entity: "product" }
                }
                other => query_err(other),
            })
    }

    fn list_products(&self, page: Page) -> Result<Vec<Product>, TradesimError> {
        self.query_all(
            "SELECT id, name, price FROM products ORDER BY id LIMIT ?1 OFFSET ?2",
            params![page.count, page.start],
            product_from_row,
        )
    }

    fn create_product(&self, input: ProductInput) -> Result<Product, TradesimError> {
        let id: i64 = self
            .conn()?
            .query_row(
                "INSERT INTO products (name, price) VALUES (?1, ?2) RETURNING id",
                params![input.name, input.price],
                |row| row.get(0),
            )
            .map_err(query_err)?;
        Ok(input.with_id(id))
    }

    fn update_product(&self, product: &Product) -> Result<(), TradesimError> {
        self.conn()?
            .execute(
                "UPDATE products SET name = ?1, price = ?2 WHERE id = ?3",
                params![product.name, product.price, product.id],
            )
            .map_err(query_err)?;
        Ok(())
    }

    fn delete_product(&self, id: i64) -> Result<(), TradesimError> {
        self.conn()?
            .execute("DELETE FROM products WHERE id = ?1", params![id])
            .map_err(query_err)?;
        Ok(())
    }

    fn create_user(&self, input: NewUser) -> Result<User, TradesimError> {
        let created_on = Utc::now();
        let id: i64 = self
            .conn()?
            .query_row(
                "INSERT INTO users (display_name, created_on, idcs_id) VALUES (?1, ?2, ?3)
                 RETURNING user_id",
                params![input.display_name, created_on.to_rfc3339(), input.idcs_id],
                |row| row.get(0),
            )
            .map_err(query_err)?;
        Ok(input.into_user(id, created_on))
    }

    fn list_symbols(&self) -> Result<Vec<Symbol>, TradesimError> {
        self.query_all(
            "SELECT symbol_id, is_nasdaq, is_sp500, is_dow, symbol FROM symbol ORDER BY symbol_id",
            [],
            |row| {
                Ok(Symbol {
                    symbol_id: row.get(0)?,
                    is_nasdaq: row.get(1)?,
                    is_sp500: row.get(2)?,
                    is_dow: row.get(3)?,
                    symbol: row.get(4)?,
                })
            },
        )
    }

    fn create_symbol(&self, input: NewSymbol) -> Result<Symbol, TradesimError> {
        let id: i64 = self
            .conn()?
            .query_row(
                INSERT_SYMBOL,
                params![input.is_nasdaq, input.is_sp500, input.is_dow, input.symbol],
                |row| row.get(0),
            )
            .map_err(query_err)?;
        Ok(input.with_id(id))
    }

    fn create_symbols(&self, rows: Vec<NewSymbol>) -> Result<Vec<Symbol>, TradesimError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;
        let mut created = Vec::with_capacity(rows.len());
        {
            let mut stmt = tx.prepare(INSERT_SYMBOL).map_err(query_err)?;
            for row in rows {
                let id: i64 = stmt
                    .query_row(
                        params![row.is_nasdaq, row.is_sp500, row.is_dow, row.symbol],
                        |r| r.get(0),
                    )
                    .map_err(query_err)?;
                created.push(row.with_id(id));
            }
        }
        tx.commit().map_err(query_err)?;
        Ok(created)
    }

    fn get_portfolio(&self, user_id: i64) -> Result<Vec<PortfolioEntry>, TradesimError> {
        self.query_all(
            "SELECT portfolio_id, is_watched, symbol_id, user_id FROM portfolio
             WHERE user_id = ?1 ORDER BY portfolio_id",
            params![user_id],
            portfolio_from_row,
        )
    }

    fn create_portfolio_entry(
        &self,
        input: NewPortfolioEntry,
    ) -> Result<PortfolioEntry, TradesimError> {
        let id: i64 = self
            .conn()?
            .query_row(
                "INSERT INTO portfolio (is_watched, symbol_id, user_id) VALUES (?1, ?2, ?3)
                 RETURNING portfolio_id",
                params![input.is_watched, input.symbol_id, input.user_id],
                |row| row.get(0),
            )
            .map_err(query_err)?;
        Ok(input.with_id(id))
    }

    fn set_watched_false(&self, symbol_id: i64, user_id: i64) -> Result<(), TradesimError> {
        self.conn()?
            .execute(
                "UPDATE portfolio SET is_watched = 0 WHERE symbol_id = ?1 AND user_id = ?2",
                params![symbol_id, user_id],
            )
            .map_err(query_err)?;
        Ok(())
    }

    fn get_news(&self, user_id: i64, page: Page) -> Result<Vec<News>, TradesimError> {
        self.query_all(
            "SELECT n.news_id, n.headline, n.body, n.link, n.symbol_id
             FROM news n JOIN portfolio p ON n.symbol_id = p.symbol_id
             WHERE p.user_id = ?1
             ORDER BY n.news_id, p.portfolio_id
             LIMIT ?2 OFFSET ?3",
            params![user_id, page.count, page.start],
            |row| {
                Ok(News {
                    news_id: row.get(0)?,
                    headline: row.get(1)?,
                    body: row.get(2)?,
                    link: row.get(3)?,
                    symbol_id: row.get(4)?,
                })
            },
        )
    }

    fn create_news(&self, input: NewNews) -> Result<News, TradesimError> {
        let id: i64 = self
            .conn()?
            .query_row(
                INSERT_NEWS,
                params![input.headline, input.body, input.link, input.symbol_id],
                |row| row.get(0),
            )
            .map_err(query_err)?;
        Ok(input.with_id(id))
    }

    fn create_news_items(&self, rows: Vec<NewNews>) -> Result<Vec<News>, TradesimError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;
        let mut created = Vec::with_capacity(rows.len());
        {
            let mut stmt = tx.prepare(INSERT_NEWS).map_err(query_err)?;
            for row in rows {
                let id: i64 = stmt
                    .query_row(
                        params![row.headline, row.body, row.link, row.symbol_id],
                        |r| r.get(0),
                    )
                    .map_err(query_err)?;
                created.push(row.with_id(id));
            }
        }
        tx.commit().map_err(query_err)?;
        Ok(created)
    }
}
