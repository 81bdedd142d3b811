// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! The result-store contract.

use async_trait::async_trait;
use modelbench_core::{BenchmarkResult, ValidationError};
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The result violated a data-model invariant and was not persisted.
    #[error("invalid result: {0}")]
    Validation(#[from] ValidationError),

    /// Caller misuse, e.g. a non-positive query limit.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A stored timestamp could not be interpreted.
    #[error("stored timestamp {0}us is out of range")]
    InvalidTimestamp(i64),

    /// The storage medium failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable, indexed storage for [`BenchmarkResult`] records.
///
/// Implementations are shared across workers, so every method takes
/// `&self`; the storage medium is expected to serialize concurrent writes
/// itself. Duplicates are permitted: no field carries a uniqueness
/// constraint.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Establish the results schema and its indexes.
    ///
    /// Idempotent, and safe to call while inserts are in flight. Failures
    /// are fatal to startup and must propagate to the caller.
    async fn ensure_indexes(&self) -> Result<()>;

    /// Append one result.
    ///
    /// Fails with [`StoreError::Validation`] if the result violates its
    /// invariants; nothing is written in that case.
    async fn insert(&self, result: &BenchmarkResult) -> Result<()>;

    /// Up to `limit` results for `model_name`, newest first.
    ///
    /// An unknown model yields an empty vec, not an error. A zero `limit`
    /// fails with [`StoreError::InvalidArgument`].
    async fn history(&self, model_name: &str, limit: u32) -> Result<Vec<BenchmarkResult>>;

    /// All results recorded for a revision, newest first.
    async fn by_commit(&self, commit_reference: &str) -> Result<Vec<BenchmarkResult>>;

    /// The `limit` best results across all models, highest throughput
    /// first. A zero `limit` fails with [`StoreError::InvalidArgument`].
    async fn leaderboard(&self, limit: u32) -> Result<Vec<BenchmarkResult>>;
}
