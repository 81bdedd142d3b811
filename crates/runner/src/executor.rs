// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! The pluggable benchmark-execution seam.
//!
//! The tracker core never talks to an inference engine directly. Workers
//! hand each task to a [`BenchmarkExecutor`], which returns the raw
//! measurements the runner derives its metrics from. Real deployments
//! wire in an engine-backed executor; [`SimulatedExecutor`] stands in
//! everywhere else.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by benchmark executors.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The inference engine reported a failure.
    #[error("inference engine failure: {0}")]
    Engine(String),

    /// The engine produced measurements that cannot be interpreted.
    #[error("unusable execution metrics: {0}")]
    BadMetrics(String),
}

/// Raw measurements captured by one benchmark execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionMetrics {
    /// Tokens processed across the whole dataset.
    pub total_tokens: u64,

    /// Elapsed execution time, from whatever monotonic source the
    /// executor uses.
    pub elapsed: Duration,

    /// Memory footprint reported by the execution environment, in GB.
    pub memory_usage_gb: f64,
}

/// Executes the measured portion of one benchmark run.
#[async_trait]
pub trait BenchmarkExecutor: Send + Sync {
    /// Process `test_dataset` on `model_name` and report measurements.
    async fn execute(
        &self,
        model_name: &str,
        test_dataset: &[String],
    ) -> Result<ExecutionMetrics, ExecutorError>;
}

/// Stand-in executor used when no inference engine is wired in.
///
/// Token counts come from whitespace splitting and the modeled elapsed
/// time charges a fixed cost per token, so derived throughput and
/// latency stay stable across runs of the same corpus.
#[derive(Debug, Clone)]
pub struct SimulatedExecutor {
    cost_per_token: Duration,
    memory_usage_gb: f64,
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self {
            cost_per_token: Duration::from_micros(100),
            memory_usage_gb: 12.5,
        }
    }
}

impl SimulatedExecutor {
    /// Simulated executor with an explicit per-token cost and memory
    /// footprint.
    pub fn new(cost_per_token: Duration, memory_usage_gb: f64) -> Self {
        Self {
            cost_per_token,
            memory_usage_gb,
        }
    }
}

#[async_trait]
impl BenchmarkExecutor for SimulatedExecutor {
    async fn execute(
        &self,
        _model_name: &str,
        test_dataset: &[String],
    ) -> Result<ExecutionMetrics, ExecutorError> {
        let total_tokens: u64 = test_dataset
            .iter()
            .map(|text| text.split_whitespace().count() as u64)
            .sum();
        let elapsed =
            Duration::from_secs_f64(self.cost_per_token.as_secs_f64() * total_tokens as f64);
        Ok(ExecutionMetrics {
            total_tokens,
            elapsed,
            memory_usage_gb: self.memory_usage_gb,
        })
    }
}
