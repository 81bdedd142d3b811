// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Single-task benchmark execution.
//!
//! [`BenchmarkRunner::run`] is the unit of work a pool worker performs:
//! execute one task, derive throughput and latency, attach the revision
//! under test, persist the result. Every failure mode is typed so the
//! worker loop can contain it without guesswork.

use chrono::Utc;
use modelbench_core::{BenchmarkResult, CommitLookup};
use modelbench_storage::{ResultStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::executor::BenchmarkExecutor;

/// Errors raised while running one benchmark task.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The task carried no inputs; per-item latency is undefined, so the
    /// run is rejected before anything executes or persists.
    #[error("empty test dataset for model {model_name}")]
    EmptyDataset {
        /// Model the rejected task named.
        model_name: String,
    },

    /// The underlying benchmark step (or the commit resolution it needs)
    /// failed. Nothing was persisted.
    #[error("benchmark execution failed for {model_name}")]
    Execution {
        /// Model the failed task named.
        model_name: String,
        /// Underlying cause.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The result was computed but could not be stored. The payload is
    /// carried here so it is not silently lost; it is not retried.
    #[error("failed to persist result for {}", result.model_name)]
    Persistence {
        /// The computed result that failed to persist.
        result: BenchmarkResult,
        /// Store failure.
        #[source]
        source: StoreError,
    },
}

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Executes one benchmark task and persists its result.
///
/// All collaborators are injected: the store, the commit lookup, and the
/// execution step. The runner holds no global state and is shared across
/// workers behind an `Arc`.
pub struct BenchmarkRunner {
    store: Arc<dyn ResultStore>,
    commits: Arc<dyn CommitLookup>,
    executor: Arc<dyn BenchmarkExecutor>,
}

impl BenchmarkRunner {
    /// Create a runner from its collaborators.
    pub fn new(
        store: Arc<dyn ResultStore>,
        commits: Arc<dyn CommitLookup>,
        executor: Arc<dyn BenchmarkExecutor>,
    ) -> Self {
        Self {
            store,
            commits,
            executor,
        }
    }

    /// Run one benchmark: execute, derive metrics, persist, return the
    /// stored result.
    pub async fn run(&self, model_name: &str, test_dataset: &[String]) -> Result<BenchmarkResult> {
        if test_dataset.is_empty() {
            return Err(RunnerError::EmptyDataset {
                model_name: model_name.to_string(),
            });
        }

        let started_at = Utc::now();
        let metrics = self
            .executor
            .execute(model_name, test_dataset)
            .await
            .map_err(|source| RunnerError::Execution {
                model_name: model_name.to_string(),
                source: Box::new(source),
            })?;

        let elapsed_secs = metrics.elapsed.as_secs_f64();
        let throughput_tokens_per_sec = if metrics.elapsed.is_zero() {
            0.0
        } else {
            metrics.total_tokens as f64 / elapsed_secs
        };
        let latency_ms = elapsed_secs * 1_000.0 / test_dataset.len() as f64;

        let commit_reference =
            self.commits
                .resolve()
                .await
                .map_err(|source| RunnerError::Execution {
                    model_name: model_name.to_string(),
                    source: Box::new(source),
                })?;

        let result = BenchmarkResult {
            model_name: model_name.to_string(),
            throughput_tokens_per_sec,
            latency_ms,
            memory_usage_gb: metrics.memory_usage_gb,
            timestamp: started_at,
            commit_reference,
        };

        debug!(
            model = %result.model_name,
            tokens = metrics.total_tokens,
            throughput = result.throughput_tokens_per_sec,
            "benchmark computed, persisting"
        );

        match self.store.insert(&result).await {
            Ok(()) => Ok(result),
            Err(source) => Err(RunnerError::Persistence { result, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{ExecutionMetrics, ExecutorError, SimulatedExecutor};
    use async_trait::async_trait;
    use mockall::mock;
    use modelbench_core::external::CommitLookupError;
    use std::time::Duration;

    mock! {
        pub Store {}

        #[async_trait]
        impl ResultStore for Store {
            async fn ensure_indexes(&self) -> modelbench_storage::store::Result<()>;
            async fn insert(
                &self,
                result: &BenchmarkResult,
            ) -> modelbench_storage::store::Result<()>;
            async fn history(
                &self,
                model_name: &str,
                limit: u32,
            ) -> modelbench_storage::store::Result<Vec<BenchmarkResult>>;
            async fn by_commit(
                &self,
                commit_reference: &str,
            ) -> modelbench_storage::store::Result<Vec<BenchmarkResult>>;
            async fn leaderboard(
                &self,
                limit: u32,
            ) -> modelbench_storage::store::Result<Vec<BenchmarkResult>>;
        }
    }

    mock! {
        pub Commits {}

        #[async_trait]
        impl CommitLookup for Commits {
            async fn resolve(&self) -> std::result::Result<String, CommitLookupError>;
        }
    }

    mock! {
        pub Executor {}

        #[async_trait]
        impl BenchmarkExecutor for Executor {
            async fn execute(
                &self,
                model_name: &str,
                test_dataset: &[String],
            ) -> std::result::Result<ExecutionMetrics, ExecutorError>;
        }
    }

    fn fixed_commits() -> MockCommits {
        let mut commits = MockCommits::new();
        commits
            .expect_resolve()
            .returning(|| Ok("abc123def456".to_string()));
        commits
    }

    fn runner_with(
        store: MockStore,
        commits: MockCommits,
        executor: Arc<dyn BenchmarkExecutor>,
    ) -> BenchmarkRunner {
        BenchmarkRunner::new(Arc::new(store), Arc::new(commits), executor)
    }

    fn dataset(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_derives_metrics_and_persists() {
        let mut store = MockStore::new();
        store
            .expect_insert()
            .times(1)
            .withf(|result| result.model_name == "model-a")
            .returning(|_| Ok(()));

        let runner = runner_with(
            store,
            fixed_commits(),
            Arc::new(SimulatedExecutor::default()),
        );
        let result = runner
            .run("model-a", &dataset(&["hello world", "one two three"]))
            .await
            .unwrap();

        // 5 tokens at 0.1ms each over 2 items.
        assert_eq!(result.model_name, "model-a");
        assert!((result.throughput_tokens_per_sec - 10_000.0).abs() < 1e-6);
        assert!((result.latency_ms - 0.25).abs() < 1e-9);
        assert!(result.latency_ms > 0.0);
        assert_eq!(result.commit_reference, "abc123def456");
        assert_eq!(result.memory_usage_gb, 12.5);
        assert!(result.validate().is_ok());
    }

    #[tokio::test]
    async fn test_empty_dataset_fails_without_touching_store() {
        // No expectations: any insert would panic the mock.
        let store = MockStore::new();
        let runner = runner_with(
            store,
            MockCommits::new(),
            Arc::new(SimulatedExecutor::default()),
        );

        let err = runner.run("model-a", &[]).await.unwrap_err();
        assert!(matches!(
            err,
            RunnerError::EmptyDataset { ref model_name } if model_name == "model-a"
        ));
    }

    #[tokio::test]
    async fn test_executor_failure_is_execution_error() {
        let store = MockStore::new();
        let mut executor = MockExecutor::new();
        executor
            .expect_execute()
            .returning(|_, _| Err(ExecutorError::Engine("cuda out of memory".to_string())));

        let runner = runner_with(store, fixed_commits(), Arc::new(executor));
        let err = runner.run("model-a", &dataset(&["x"])).await.unwrap_err();
        assert!(matches!(err, RunnerError::Execution { .. }));
    }

    #[tokio::test]
    async fn test_commit_lookup_failure_is_execution_error() {
        let store = MockStore::new();
        let mut commits = MockCommits::new();
        commits.expect_resolve().returning(|| {
            Err(CommitLookupError::Unavailable(
                "MODELBENCH_COMMIT_SHA unset".to_string(),
            ))
        });

        let runner = runner_with(store, commits, Arc::new(SimulatedExecutor::default()));
        let err = runner.run("model-a", &dataset(&["x"])).await.unwrap_err();
        assert!(matches!(err, RunnerError::Execution { .. }));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_result_in_error() {
        let mut store = MockStore::new();
        store
            .expect_insert()
            .returning(|_| Err(StoreError::InvalidArgument("injected failure".to_string())));

        let runner = runner_with(
            store,
            fixed_commits(),
            Arc::new(SimulatedExecutor::default()),
        );
        let err = runner
            .run("model-a", &dataset(&["hello world"]))
            .await
            .unwrap_err();

        match err {
            RunnerError::Persistence { result, .. } => {
                assert_eq!(result.model_name, "model-a");
                assert!(result.throughput_tokens_per_sec > 0.0);
            }
            other => panic!("expected Persistence error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_token_dataset_reports_zero_throughput() {
        let mut store = MockStore::new();
        store.expect_insert().returning(|_| Ok(()));
        let mut executor = MockExecutor::new();
        executor.expect_execute().returning(|_, _| {
            Ok(ExecutionMetrics {
                total_tokens: 0,
                elapsed: Duration::ZERO,
                memory_usage_gb: 1.0,
            })
        });

        let runner = runner_with(store, fixed_commits(), Arc::new(executor));
        let result = runner.run("model-a", &dataset(&[""])).await.unwrap();
        assert_eq!(result.throughput_tokens_per_sec, 0.0);
        assert!(result.validate().is_ok());
    }
}
