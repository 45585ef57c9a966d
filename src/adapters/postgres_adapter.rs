//! PostgreSQL store.

use crate::domain::error::TradesimError;
use crate::domain::news::{NewNews, News};
use crate::domain::page::Page;
use crate::domain::portfolio::{NewPortfolioEntry, PortfolioEntry};
use crate::domain::product::{Product, ProductInput};
use crate::domain::symbol::{NewSymbol, Symbol};
use crate::domain::user::{NewUser, User};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Utc};
use log::info;
use postgres::Row;
use postgres::types::ToSql;
use r2d2::{Pool, PooledConnection};
use r2d2_postgres::PostgresConnectionManager;
use r2d2_postgres::postgres::NoTls;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS products (
        id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        name TEXT NOT NULL,
        price DOUBLE PRECISION NOT NULL
    );
    CREATE TABLE IF NOT EXISTS users (
        user_id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        display_name TEXT NOT NULL,
        created_on TIMESTAMPTZ NOT NULL,
        idcs_id TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS symbol (
        symbol_id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        is_nasdaq BOOLEAN NOT NULL,
        is_sp500 BOOLEAN NOT NULL,
        is_dow BOOLEAN NOT NULL,
        symbol TEXT NOT NULL CHECK (symbol <> '')
    );
    CREATE TABLE IF NOT EXISTS portfolio (
        portfolio_id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        is_watched BOOLEAN NOT NULL,
        symbol_id BIGINT NOT NULL,
        user_id BIGINT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_portfolio_user ON portfolio(user_id);
    CREATE TABLE IF NOT EXISTS news (
        news_id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        headline TEXT NOT NULL,
        body TEXT NOT NULL,
        link TEXT NOT NULL,
        symbol_id BIGINT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_news_symbol ON news(symbol_id);";

const INSERT_SYMBOL: &str =
    "INSERT INTO symbol (is_nasdaq, is_sp500, is_dow, symbol) VALUES ($1, $2, $3, $4)
     RETURNING symbol_id";

const INSERT_NEWS: &str = "INSERT INTO news (headline, body, link, symbol_id) VALUES ($1, $2, $3, $4)
     RETURNING news_id";

type Manager = PostgresConnectionManager<NoTls>;

pub struct PostgresAdapter {
    pool: Pool<Manager>,
}

fn query_err(e: postgres::Error) -> TradesimError {
    TradesimError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn product_from_row(row: &Row) -> Product {
    Product {
        id: row.get(0),
        name: row.get(1),
        price: row.get(2),
    }
}

impl PostgresAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TradesimError> {
        let connection_string = config.require_string("postgres", "connection_string")?;
        let pool_size = config.pool_size("postgres")?;

        let pg_config = connection_string
            .parse::<postgres::Config>()
            .map_err(|e| TradesimError::ConfigInvalid {
                section: "postgres".into(),
                key: "connection_string".into(),
                reason: e.to_string(),
            })?;

        let manager = PostgresConnectionManager::new(pg_config, NoTls);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e| TradesimError::Database {
                reason: e.to_string(),
            })?;

        info!("connected to postgres (pool size {pool_size})");
        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<Manager>, TradesimError> {
        self.pool.get().map_err(|e| TradesimError::Database {
            reason: e.to_string(),
        })
    }

    pub fn initialize_schema(&self) -> Result<(), TradesimError> {
        self.conn()?.batch_execute(SCHEMA).map_err(query_err)
    }

    fn insert_returning_id(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<i64, TradesimError> {
        let row = self.conn()?.query_one(sql, params).map_err(query_err)?;
        Ok(row.get(0))
    }

    fn query(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, TradesimError> {
        self.conn()?.query(sql, params).map_err(query_err)
    }
}

impl DataPort for PostgresAdapter {
    fn get_product(&self, id: i64) -> Result<Product, TradesimError> {
        self.conn()?
            .query_opt("SELECT id, name, price FROM products WHERE id = $1", &[&id])
            .map_err(query_err)?
            .map(|row| product_from_row(&row))
            .ok_or(TradesimError::NotFound { entity: "product" })
    }

    fn list_products(&self, page: Page) -> Result<Vec<Product>, TradesimError> {
        let rows = self.query(
            "SELECT id, name, price FROM products ORDER BY id
             OFFSET $1 ROWS FETCH NEXT $2 ROWS ONLY",
            &[&page.start, &page.count],
        )?;
        Ok(rows.iter().map(product_from_row).collect())
    }

    fn create_product(&self, input: ProductInput) -> Result<Product, TradesimError> {
        let id = self.insert_returning_id(
            "INSERT INTO products (name, price) VALUES ($1, $2) RETURNING id",
            &[&input.name, &input.price],
        )?;
        Ok(input.with_id(id))
    }

    fn update_product(&self, product: &Product) -> Result<(), TradesimError> {
        self.conn()?
            .execute(
                "UPDATE products SET name = $1, price = $2 WHERE id = $3",
                &[&product.name, &product.price, &product.id],
            )
            .map_err(query_err)?;
        Ok(())
    }

    fn delete_product(&self, id: i64) -> Result<(), TradesimError> {
        self.conn()?
            .execute("DELETE FROM products WHERE id = $1", &[&id])
            .map_err(query_err)?;
        Ok(())
    }

    fn create_user(&self, input: NewUser) -> Result<User, TradesimError> {
        let created_on: DateTime<Utc> = Utc::now();
        let id = self.insert_returning_id(
            "INSERT INTO users (display_name, created_on, idcs_id) VALUES ($1, $2, $3)
             RETURNING user_id",
            &[&input.display_name, &created_on, &input.idcs_id],
        )?;
        Ok(input.into_user(id, created_on))
    }

    fn list_symbols(&self) -> Result<Vec<Symbol>, TradesimError> {
        let rows = self.query(
            "SELECT symbol_id, is_nasdaq, is_sp500, is_dow, symbol FROM symbol ORDER BY symbol_id",
            &[],
        )?;
        Ok(rows
            .iter()
            .map(|row| Symbol {
                symbol_id: row.get(0),
                is_nasdaq: row.get(1),
                is_sp500: row.get(2),
                is_dow: row.get(3),
                symbol: row.get(4),
            })
            .collect())
    }

    fn create_symbol(&self, input: NewSymbol) -> Result<Symbol, TradesimError> {
        let id = self.insert_returning_id(
            INSERT_SYMBOL,
            &[&input.is_nasdaq, &input.is_sp500, &input.is_dow, &input.symbol],
        )?;
        Ok(input.with_id(id))
    }

    fn create_symbols(&self, rows: Vec<NewSymbol>) -> Result<Vec<Symbol>, TradesimError> {
        let mut conn = self.conn()?;
        let mut tx = conn.transaction().map_err(query_err)?;
        let stmt = tx.prepare(INSERT_SYMBOL).map_err(query_err)?;
        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = tx
                .query_one(
                    &stmt,
                    &[&row.is_nasdaq, &row.is_sp500, &row.is_dow, &row.symbol],
                )
                .map_err(query_err)?
                .get(0);
            created.push(row.with_id(id));
        }
        tx.commit().map_err(query_err)?;
        Ok(created)
    }

    fn get_portfolio(&self, user_id: i64) -> Result<Vec<PortfolioEntry>, TradesimError> {
        let rows = self.query(
            "SELECT portfolio_id, is_watched, symbol_id, user_id FROM portfolio
             WHERE user_id = $1 ORDER BY portfolio_id",
            &[&user_id],
        )?;
        Ok(rows
            .iter()
            .map(|row| PortfolioEntry {
                portfolio_id: row.get(0),
                is_watched: row.get(1),
                symbol_id: row.get(2),
                user_id: row.get(3),
            })
            .collect())
    }

    fn create_portfolio_entry(
        &self,
        input: NewPortfolioEntry,
    ) -> Result<PortfolioEntry, TradesimError> {
        let id = self.insert_returning_id(
            "INSERT INTO portfolio (is_watched, symbol_id, user_id) VALUES ($1, $2, $3)
             RETURNING portfolio_id",
            &[&input.is_watched, &input.symbol_id, &input.user_id],
        )?;
        Ok(input.with_id(id))
    }

    fn set_watched_false(&self, symbol_id: i64, user_id: i64) -> Result<(), TradesimError> {
        self.conn()?
            .execute(
                "UPDATE portfolio SET is_watched = FALSE WHERE symbol_id = $1 AND user_id = $2",
                &[&symbol_id, &user_id],
            )
            .map_err(query_err)?;
        Ok(())
    }

    fn get_news(&self, user_id: i64, page: Page) -> Result<Vec<News>, TradesimError> {
        let rows = self.query(
            "SELECT n.news_id, n.headline, n.body, n.link, n.symbol_id
             FROM news n JOIN portfolio p ON n.symbol_id = p.symbol_id
             WHERE p.user_id = $1
             ORDER BY n.news_id, p.portfolio_id
             OFFSET $2 ROWS FETCH NEXT $3 ROWS ONLY",
            &[&user_id, &page.start, &page.count],
        )?;
        Ok(rows
            .iter()
            .map(|row| News {
                news_id: row.get(0),
                headline: row.get(1),
                body: row.get(2),
                link: row.get(3),
                symbol_id: row.get(4),
            })
            .collect())
    }

    fn create_news(&self, input: NewNews) -> Result<News, TradesimError> {
        let id = self.insert_returning_id(
            INSERT_NEWS,
            &[&input.headline, &input.body, &input.link, &input.symbol_id],
        )?;
        Ok(input.with_id(id))
    }

    fn create_news_items(&self, rows: Vec<NewNews>) -> Result<Vec<News>, TradesimError> {
        let mut conn = self.conn()?;
        let mut tx = conn.transaction().map_err(query_err)?;
        let stmt = tx.prepare(INSERT_NEWS).map_err(query_err)?;
        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = tx
                .query_one(
                    &stmt,
                    &[&row.headline, &row.body, &row.link, &row.symbol_id],
                )
                .map_err(query_err)?
                .get(0);
            created.push(row.with_id(id));
        }
        tx.commit().map_err(query_err)?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MapConfig(Vec<(&'static str, &'static str, &'static str)>);

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.0
                .iter()
                .find(|(s, k, _)| *s == section && *k == key)
                .map(|(_, _, v)| v.to_string())
        }
        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    #[test]
    fn from_config_missing_connection_string() {
        let result = PostgresAdapter::from_config(&MapConfig(vec![]));
        match result {
            Err(TradesimError::ConfigMissing { section, key }) => {
                assert_eq!(section, "postgres");
                assert_eq!(key, "connection_string");
            }
            Err(other) => panic!("expected ConfigMissing, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }

    #[test]
    fn from_config_rejects_malformed_connection_string() {
        let config = MapConfig(vec![("postgres", "connection_string", "host='unterminated")]);
        assert!(matches!(
            PostgresAdapter::from_config(&config),
            Err(TradesimError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn from_config_rejects_oversized_pool() {
        let config = MapConfig(vec![
            ("postgres", "connection_string", "host=localhost dbname=tradesim"),
            ("postgres", "pool_size", "4294967296"),
        ]);
        match PostgresAdapter::from_config(&config) {
            Err(TradesimError::ConfigInvalid { section, key, .. }) => {
                assert_eq!(section, "postgres");
                assert_eq!(key, "pool_size");
            }
            Err(other) => panic!("expected ConfigInvalid, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }
}
