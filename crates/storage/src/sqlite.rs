// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! SQLite-backed result store.
//!
//! Results live in a single `benchmark_results` table. Timestamps are
//! persisted as integer microseconds since the Unix epoch so that index
//! order matches chronological order exactly, independent of any text
//! datetime format.

use async_trait::async_trait;
use chrono::DateTime;
use modelbench_core::BenchmarkResult;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::store::{Result, ResultStore, StoreError};

/// Schema and index statements. `IF NOT EXISTS` keeps every statement
/// idempotent, so `ensure_indexes` may race inserts and repeated calls.
const SCHEMA_STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS benchmark_results (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        model_name TEXT NOT NULL,
        throughput_tokens_per_sec REAL NOT NULL,
        latency_ms REAL NOT NULL,
        memory_usage_gb REAL NOT NULL,
        timestamp_us INTEGER NOT NULL,
        commit_reference TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_results_model_timestamp
        ON benchmark_results (model_name ASC, timestamp_us DESC)",
    "CREATE INDEX IF NOT EXISTS idx_results_commit
        ON benchmark_results (commit_reference ASC)",
    "CREATE INDEX IF NOT EXISTS idx_results_throughput
        ON benchmark_results (throughput_tokens_per_sec DESC)",
];

const SELECT_COLUMNS: &str = "model_name, throughput_tokens_per_sec, latency_ms, \
     memory_usage_gb, timestamp_us, commit_reference";

/// [`ResultStore`] implementation over an sqlx SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteResultStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ResultRow {
    model_name: String,
    throughput_tokens_per_sec: f64,
    latency_ms: f64,
    memory_usage_gb: f64,
    timestamp_us: i64,
    commit_reference: String,
}

impl ResultRow {
    fn into_result(self) -> Result<BenchmarkResult> {
        let timestamp = DateTime::from_timestamp_micros(self.timestamp_us)
            .ok_or(StoreError::InvalidTimestamp(self.timestamp_us))?;
        Ok(BenchmarkResult {
            model_name: self.model_name,
            throughput_tokens_per_sec: self.throughput_tokens_per_sec,
            latency_ms: self.latency_ms,
            memory_usage_gb: self.memory_usage_gb,
            timestamp,
            commit_reference: self.commit_reference,
        })
    }
}

impl SqliteResultStore {
    /// Connect to `url` (e.g. `sqlite://modelbench.db`), creating the
    /// database file if it does not exist yet.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn rows_to_results(rows: Vec<ResultRow>) -> Result<Vec<BenchmarkResult>> {
        rows.into_iter().map(ResultRow::into_result).collect()
    }

    fn require_positive(limit: u32, what: &str) -> Result<i64> {
        if limit == 0 {
            return Err(StoreError::InvalidArgument(format!(
                "{what} limit must be a positive integer"
            )));
        }
        Ok(i64::from(limit))
    }
}

#[async_trait]
impl ResultStore for SqliteResultStore {
    async fn ensure_indexes(&self) -> Result<()> {
        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        debug!("benchmark_results schema and indexes ready");
        Ok(())
    }

    async fn insert(&self, result: &BenchmarkResult) -> Result<()> {
        result.validate()?;
        sqlx::query(
            "INSERT INTO benchmark_results \
                (model_name, throughput_tokens_per_sec, latency_ms, \
                 memory_usage_gb, timestamp_us, commit_reference) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&result.model_name)
        .bind(result.throughput_tokens_per_sec)
        .bind(result.latency_ms)
        .bind(result.memory_usage_gb)
        .bind(result.timestamp.timestamp_micros())
        .bind(&result.commit_reference)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn history(&self, model_name: &str, limit: u32) -> Result<Vec<BenchmarkResult>> {
        let limit = Self::require_positive(limit, "history")?;
        let rows: Vec<ResultRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM benchmark_results \
             WHERE model_name = ?1 ORDER BY timestamp_us DESC LIMIT ?2"
        ))
        .bind(model_name)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Self::rows_to_results(rows)
    }

    async fn by_commit(&self, commit_reference: &str) -> Result<Vec<BenchmarkResult>> {
        let rows: Vec<ResultRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM benchmark_results \
             WHERE commit_reference = ?1 ORDER BY timestamp_us DESC"
        ))
        .bind(commit_reference)
        .fetch_all(&self.pool)
        .await?;
        Self::rows_to_results(rows)
    }

    async fn leaderboard(&self, limit: u32) -> Result<Vec<BenchmarkResult>> {
        let limit = Self::require_positive(limit, "leaderboard")?;
        let rows: Vec<ResultRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM benchmark_results \
             ORDER BY throughput_tokens_per_sec DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Self::rows_to_results(rows)
    }
}
