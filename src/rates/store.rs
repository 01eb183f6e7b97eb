//! Rate persistence.
//!
//! Each request opens its own connection, migrates the schema, inserts one
//! row and drops the connection. Setup (open + migrate) is unbounded; only the
//! insert runs under the 10ms persistence deadline, enforced by the caller.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;

use crate::error::{RateError, RateResult};
use crate::rates::types::{PersistedRateRecord, RateQuote};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS exchange_rate (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL,
    codein TEXT NOT NULL,
    name TEXT NOT NULL,
    high TEXT NOT NULL,
    low TEXT NOT NULL,
    var_bid TEXT NOT NULL,
    pct_change TEXT NOT NULL,
    bid TEXT NOT NULL,
    ask TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    create_date TEXT NOT NULL
)";

const INSERT_RATE: &str = "INSERT INTO exchange_rate
    (code, codein, name, high, low, var_bid, pct_change, bid, ask, timestamp, create_date)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const SELECT_RATES: &str = "SELECT id, code, codein, name, high, low, var_bid, pct_change,
    bid, ask, timestamp, create_date FROM exchange_rate ORDER BY id";

/// Factory for per-request store connections.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Open the store and bring its schema up to date.
    async fn connect(&self) -> RateResult<Box<dyn RateConnection>>;
}

/// An open, migrated store connection.
#[async_trait]
pub trait RateConnection: Send {
    /// Append one quote. Records are never updated or deleted.
    async fn insert(&mut self, quote: &RateQuote) -> RateResult<PersistedRateRecord>;
}

/// SQLite-backed store, one file per deployment.
#[derive(Debug, Clone)]
pub struct SqliteRateStore {
    database_url: String,
}

impl SqliteRateStore {
    /// Create a store for `database_url` (e.g. `sqlite://exchange_rates.db`).
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Open and migrate, returning the concrete connection type.
    pub async fn open(&self) -> RateResult<SqliteRateConnection> {
        let options = SqliteConnectOptions::from_str(&self.database_url)
            .map_err(|e| RateError::PersistenceSetup(e.to_string()))?
            .create_if_missing(true);

        let mut conn = options
            .connect()
            .await
            .map_err(|e| RateError::PersistenceSetup(e.to_string()))?;

        sqlx::query(CREATE_TABLE)
            .execute(&mut conn)
            .await
            .map_err(|e| RateError::PersistenceSetup(e.to_string()))?;

        tracing::debug!(database_url = %self.database_url, "Rate store opened");
        Ok(SqliteRateConnection { conn })
    }
}

#[async_trait]
impl RateStore for SqliteRateStore {
    async fn connect(&self) -> RateResult<Box<dyn RateConnection>> {
        let conn = self.open().await?;
        Ok(Box::new(conn))
    }
}

/// A live SQLite connection; closed when dropped.
pub struct SqliteRateConnection {
    conn: SqliteConnection,
}

impl SqliteRateConnection {
    /// All stored records, oldest first.
    pub async fn records(&mut self) -> RateResult<Vec<PersistedRateRecord>> {
        sqlx::query_as::<_, PersistedRateRecord>(SELECT_RATES)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| RateError::PersistenceWrite(e.to_string()))
    }

    /// Close the connection explicitly, flushing any pending work.
    pub async fn close(self) -> RateResult<()> {
        self.conn
            .close()
            .await
            .map_err(|e| RateError::PersistenceWrite(e.to_string()))
    }
}

#[async_trait]
impl RateConnection for SqliteRateConnection {
    async fn insert(&mut self, quote: &RateQuote) -> RateResult<PersistedRateRecord> {
        let result = sqlx::query(INSERT_RATE)
            .bind(&quote.code)
            .bind(&quote.codein)
            .bind(&quote.name)
            .bind(&quote.high)
            .bind(&quote.low)
            .bind(&quote.var_bid)
            .bind(&quote.pct_change)
            .bind(&quote.bid)
            .bind(&quote.ask)
            .bind(&quote.timestamp)
            .bind(&quote.create_date)
            .execute(&mut self.conn)
            .await
            .map_err(|e| RateError::PersistenceWrite(e.to_string()))?;

        Ok(PersistedRateRecord {
            id: result.last_insert_rowid(),
            quote: quote.clone(),
        })
    }
}
