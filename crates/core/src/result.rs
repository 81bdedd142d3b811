// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark result types.
//!
//! This module provides the canonical `BenchmarkResult` struct produced by
//! every benchmark run and persisted through the result store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a benchmark result violates its invariants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// The model identifier was empty.
    #[error("model_name must not be empty")]
    EmptyModelName,

    /// A metric field held NaN or an infinity.
    #[error("{field} must be a finite number, got {value}")]
    NonFiniteMetric {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A metric field was negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeMetric {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Canonical benchmark result structure.
///
/// One record per benchmark run, immutable once constructed. Results are
/// persisted through the result store and queried per model in descending
/// timestamp order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Model under test.
    pub model_name: String,

    /// Tokens processed per second over the whole run.
    pub throughput_tokens_per_sec: f64,

    /// Mean per-item latency in milliseconds. Undefined for an empty
    /// corpus, which is why such runs are rejected before execution.
    pub latency_ms: f64,

    /// Memory footprint reported by the execution environment, in GB.
    pub memory_usage_gb: f64,

    /// Wall-clock time at which the run started. Query ordering uses this
    /// field, not insertion order.
    pub timestamp: DateTime<Utc>,

    /// Revision of the code under test. Opaque to this subsystem; resolved
    /// by an external collaborator.
    pub commit_reference: String,
}

impl BenchmarkResult {
    /// Check the result's invariants.
    ///
    /// A result that fails validation must never be persisted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.model_name.is_empty() {
            return Err(ValidationError::EmptyModelName);
        }

        let metrics = [
            ("throughput_tokens_per_sec", self.throughput_tokens_per_sec),
            ("latency_ms", self.latency_ms),
            ("memory_usage_gb", self.memory_usage_gb),
        ];
        for (field, value) in metrics {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteMetric { field, value });
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeMetric { field, value });
            }
        }

        Ok(())
    }
}
