// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! The externally exposed facade.
//!
//! [`Tracker`] wires the queue, pool, runner, and store together behind
//! the surface outside callers use: submit work, control the worker
//! lifecycle, read history. Construction establishes the storage schema;
//! a failure there is fatal and propagates, since every later query
//! would otherwise run unindexed.

use modelbench_core::{BenchmarkResult, BenchmarkTask, CommitLookup, TrackerConfig};
use modelbench_storage::{ResultStore, StoreError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::executor::BenchmarkExecutor;
use crate::pool::WorkerPool;
use crate::queue::{QueueError, TaskQueue};
use crate::runner::BenchmarkRunner;

/// Facade over the benchmark tracker: task intake, worker lifecycle, and
/// the history read path.
///
/// All methods take `&self`; the facade is meant to be shared behind an
/// `Arc` between producers and whatever owns the lifecycle.
pub struct Tracker {
    queue: Arc<TaskQueue>,
    pool: Mutex<WorkerPool>,
    store: Arc<dyn ResultStore>,
    runner: Arc<BenchmarkRunner>,
}

impl Tracker {
    /// Build a tracker from its collaborators and establish the storage
    /// schema.
    ///
    /// Fails if `ensure_indexes` fails; the tracker must not start with
    /// an unindexed store.
    pub async fn new(
        config: &TrackerConfig,
        store: Arc<dyn ResultStore>,
        commits: Arc<dyn CommitLookup>,
        executor: Arc<dyn BenchmarkExecutor>,
    ) -> Result<Self, StoreError> {
        store.ensure_indexes().await?;

        let queue = Arc::new(TaskQueue::new(config.queue_capacity));
        let runner = Arc::new(BenchmarkRunner::new(store.clone(), commits, executor));
        let pool = Mutex::new(WorkerPool::new(queue.clone(), config.poll_timeout()));
        info!(
            queue_capacity = config.queue_capacity,
            "benchmark tracker ready"
        );

        Ok(Self {
            queue,
            pool,
            store,
            runner,
        })
    }

    /// Enqueue a benchmark task, suspending while the queue is full.
    ///
    /// Fire-and-forget: execution failures surface in logs, not here.
    pub async fn submit_task(
        &self,
        model_name: impl Into<String>,
        test_dataset: Vec<String>,
    ) -> Result<(), QueueError> {
        self.queue
            .submit(BenchmarkTask::new(model_name, test_dataset))
            .await
    }

    /// Start `worker_count` workers. No-op with a warning if already
    /// running.
    pub async fn start(&self, worker_count: usize) {
        self.pool.lock().await.start(worker_count, self.runner.clone());
    }

    /// Stop the workers, letting in-flight tasks finish.
    pub async fn stop(&self) {
        self.pool.lock().await.stop().await;
    }

    /// Whether the pool is currently running.
    pub async fn is_running(&self) -> bool {
        self.pool.lock().await.is_running()
    }

    /// Number of tasks waiting in the queue.
    pub fn pending_tasks(&self) -> usize {
        self.queue.pending()
    }

    /// Up to `limit` stored results for `model_name`, newest first.
    pub async fn history(
        &self,
        model_name: &str,
        limit: u32,
    ) -> Result<Vec<BenchmarkResult>, StoreError> {
        self.store.history(model_name, limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SimulatedExecutor;
    use async_trait::async_trait;
    use modelbench_core::external::CommitLookupError;
    use modelbench_storage::SqliteResultStore;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::time::sleep;

    struct FixedCommits;

    #[async_trait]
    impl CommitLookup for FixedCommits {
        async fn resolve(&self) -> Result<String, CommitLookupError> {
            Ok("abc123def456".to_string())
        }
    }

    /// Store whose schema setup always fails.
    struct BrokenStore;

    #[async_trait]
    impl ResultStore for BrokenStore {
        async fn ensure_indexes(&self) -> modelbench_storage::store::Result<()> {
            Err(StoreError::InvalidArgument(
                "schema unavailable".to_string(),
            ))
        }

        async fn insert(
            &self,
            _result: &BenchmarkResult,
        ) -> modelbench_storage::store::Result<()> {
            unimplemented!("never reached in tests")
        }

        async fn history(
            &self,
            _model_name: &str,
            _limit: u32,
        ) -> modelbench_storage::store::Result<Vec<BenchmarkResult>> {
            unimplemented!("never reached in tests")
        }

        async fn by_commit(
            &self,
            _commit_reference: &str,
        ) -> modelbench_storage::store::Result<Vec<BenchmarkResult>> {
            unimplemented!("never reached in tests")
        }

        async fn leaderboard(
            &self,
            _limit: u32,
        ) -> modelbench_storage::store::Result<Vec<BenchmarkResult>> {
            unimplemented!("never reached in tests")
        }
    }

    fn test_config(queue_capacity: usize) -> TrackerConfig {
        TrackerConfig {
            queue_capacity,
            worker_count: 2,
            poll_timeout_ms: 20,
            database_url: String::new(),
        }
    }

    async fn sqlite_tracker(queue_capacity: usize) -> (Arc<Tracker>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("tracker.db").display());
        let store = Arc::new(SqliteResultStore::connect(&url).await.unwrap());
        let tracker = Tracker::new(
            &test_config(queue_capacity),
            store,
            Arc::new(FixedCommits),
            Arc::new(SimulatedExecutor::default()),
        )
        .await
        .unwrap();
        (Arc::new(tracker), dir)
    }

    #[tokio::test]
    async fn test_schema_failure_is_fatal_to_construction() {
        let result = Tracker::new(
            &test_config(4),
            Arc::new(BrokenStore),
            Arc::new(FixedCommits),
            Arc::new(SimulatedExecutor::default()),
        )
        .await;
        assert!(matches!(result, Err(StoreError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_submitted_tasks_end_up_in_history() {
        let (tracker, _dir) = sqlite_tracker(16).await;

        for _ in 0..3 {
            tracker
                .submit_task("model-a", vec!["hello world benchmark".to_string()])
                .await
                .unwrap();
        }
        tracker
            .submit_task("model-b", vec!["another corpus".to_string()])
            .await
            .unwrap();

        tracker.start(2).await;
        assert!(tracker.is_running().await);

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let a = tracker.history("model-a", 10).await.unwrap();
            let b = tracker.history("model-b", 10).await.unwrap();
            if a.len() == 3 && b.len() == 1 {
                break;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "benchmarks did not complete in time"
            );
            sleep(Duration::from_millis(10)).await;
        }
        tracker.stop().await;
        assert!(!tracker.is_running().await);

        let history = tracker.history("model-a", 10).await.unwrap();
        assert!(history.iter().all(|r| r.latency_ms > 0.0));
        assert!(history.iter().all(|r| r.commit_reference == "abc123def456"));
    }

    #[tokio::test]
    async fn test_blocked_submit_resumes_once_workers_drain_the_queue() {
        let (tracker, _dir) = sqlite_tracker(2).await;

        tracker
            .submit_task("model-a", vec!["one two".to_string()])
            .await
            .unwrap();
        tracker
            .submit_task("model-a", vec!["three four".to_string()])
            .await
            .unwrap();

        // Queue is at capacity; the third submit must suspend.
        let producer = {
            let tracker = tracker.clone();
            tokio::spawn(async move {
                tracker
                    .submit_task("model-a", vec!["five six".to_string()])
                    .await
            })
        };
        sleep(Duration::from_millis(100)).await;
        assert!(!producer.is_finished());

        // Starting a worker drains the queue and releases the producer.
        tracker.start(1).await;
        tokio::time::timeout(Duration::from_secs(5), producer)
            .await
            .expect("suspended submit should resume after start")
            .unwrap()
            .unwrap();

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while tracker.history("model-a", 10).await.unwrap().len() < 3 {
            assert!(
                tokio::time::Instant::now() < deadline,
                "queued tasks did not drain in time"
            );
            sleep(Duration::from_millis(10)).await;
        }
        tracker.stop().await;
        assert_eq!(tracker.pending_tasks(), 0);
    }
}
