use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::models::Observation;
use crate::utils::error::AppError;

const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS price_history (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sku TEXT NOT NULL,
        site TEXT NOT NULL,
        price_cents INTEGER NOT NULL,
        shipping_cents INTEGER NOT NULL,
        available INTEGER NOT NULL,
        observed_at TEXT NOT NULL
    )";

const CREATE_INDEX: &str = "
    CREATE INDEX IF NOT EXISTS ix_price_history_sku_ts
    ON price_history (sku, observed_at)";

/// Append-only price history backed by SQLite. Opened once at startup and
/// shared for the whole run; this is the sole source of truth for history
/// between invocations.
///
/// Amounts are stored as integer cents so `MIN()` aggregates exactly in SQL.
#[derive(Clone)]
pub struct ObservationStore {
    pool: SqlitePool,
}

impl ObservationStore {
    /// Open (creating if missing) the database and ensure the schema exists.
    /// Failure here is the one fatal error of a run.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        sqlx::query(CREATE_INDEX).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Append one observation stamped with the current time.
    pub async fn record(&self, observation: &Observation) -> Result<i64, AppError> {
        self.record_at(observation, Utc::now()).await
    }

    /// Append one observation with an explicit timestamp. Used when
    /// importing history; `record` is the normal path.
    pub async fn record_at(
        &self,
        observation: &Observation,
        observed_at: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        observation.validate()?;
        let price_cents = to_cents(observation.price)?;
        let shipping_cents = to_cents(observation.shipping)?;

        let result = sqlx::query(
            "INSERT INTO price_history (sku, site, price_cents, shipping_cents, available, observed_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&observation.sku)
        .bind(&observation.site)
        .bind(price_cents)
        .bind(shipping_cents)
        .bind(observation.available)
        .bind(observed_at)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Lowest price among available observations for `sku` with a timestamp
    /// in `[as_of - window, as_of]`, or `None` when nothing qualifies.
    ///
    /// Unavailable readings are excluded on purpose: an out-of-stock listing
    /// must not set a low that later suppresses a real alert. The filter is
    /// on the timestamp range, never on insertion order.
    pub async fn trailing_minimum(
        &self,
        sku: &str,
        window: Duration,
        as_of: DateTime<Utc>,
    ) -> Result<Option<Decimal>, AppError> {
        let since = as_of - window;
        let min_cents: Option<i64> = sqlx::query_scalar(
            "SELECT MIN(price_cents) FROM price_history
             WHERE sku = ?
               AND available = 1
               AND observed_at BETWEEN ? AND ?",
        )
        .bind(sku)
        .bind(since)
        .bind(as_of)
        .fetch_one(&self.pool)
        .await?;

        Ok(min_cents.map(from_cents))
    }

    pub async fn observation_count(&self, sku: &str) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM price_history WHERE sku = ?")
            .bind(sku)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn to_cents(amount: Decimal) -> Result<i64, AppError> {
    (amount.round_dp(2) * Decimal::ONE_HUNDRED)
        .to_i64()
        .ok_or_else(|| AppError::InvalidObservation(format!("amount {amount} out of range")))
}

fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
