// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Worker lifecycle.
//!
//! A pool owns a configurable number of concurrent workers, all pulling
//! from one shared [`TaskQueue`]. Each worker loops on a timed `take`:
//! a dequeued task is run to completion through the [`BenchmarkRunner`],
//! and a timeout is the moment the worker re-checks the running flag.
//! Stopping therefore takes at most roughly one poll interval plus the
//! remainder of whatever task is currently executing.
//!
//! A failing task is logged and dropped; it never terminates the worker
//! or the pool.

use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::queue::TaskQueue;
use crate::runner::{BenchmarkRunner, RunnerError};

/// A fixed-size pool of concurrent benchmark workers.
pub struct WorkerPool {
    queue: Arc<TaskQueue>,
    poll_timeout: Duration,
    running: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Create a stopped pool over `queue`.
    ///
    /// `poll_timeout` bounds how long an idle worker waits before
    /// re-checking for shutdown.
    pub fn new(queue: Arc<TaskQueue>, poll_timeout: Duration) -> Self {
        Self {
            queue,
            poll_timeout,
            running: Arc::new(AtomicBool::new(false)),
            workers: Vec::new(),
        }
    }

    /// Whether workers are currently accepting tasks.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Number of spawned workers.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Spawn `worker_count` workers executing tasks through `runner`.
    ///
    /// Calling `start` on a pool that is already running is a no-op with
    /// a warning.
    pub fn start(&mut self, worker_count: usize, runner: Arc<BenchmarkRunner>) {
        if self.is_running() {
            warn!("worker pool already running, ignoring start request");
            return;
        }

        self.running.store(true, Ordering::SeqCst);
        for worker_id in 0..worker_count {
            let queue = self.queue.clone();
            let runner = runner.clone();
            let running = self.running.clone();
            let poll_timeout = self.poll_timeout;
            self.workers.push(tokio::spawn(async move {
                worker_loop(worker_id, queue, runner, running, poll_timeout).await;
            }));
        }
        info!(worker_count, "worker pool started");
    }

    /// Stop accepting tasks and wait for every worker to finish.
    ///
    /// In-flight tasks run to completion; nothing new is dequeued once
    /// the running flag drops. Tasks still queued stay queued.
    pub async fn stop(&mut self) {
        if !self.is_running() {
            return;
        }

        self.running.store(false, Ordering::SeqCst);
        debug!("worker pool draining");
        for join in join_all(self.workers.drain(..)).await {
            if let Err(err) = join {
                error!(error = %err, "worker terminated abnormally");
            }
        }
        info!("worker pool stopped");
    }
}

async fn worker_loop(
    worker_id: usize,
    queue: Arc<TaskQueue>,
    runner: Arc<BenchmarkRunner>,
    running: Arc<AtomicBool>,
    poll_timeout: Duration,
) {
    debug!(worker_id, "worker started");
    while running.load(Ordering::SeqCst) {
        let Some(task) = queue.take(poll_timeout).await else {
            continue;
        };

        info!(
            worker_id,
            task_id = %task.task_id,
            model = %task.model_name,
            "processing benchmark task"
        );
        match runner.run(&task.model_name, &task.test_dataset).await {
            Ok(result) => {
                info!(
                    worker_id,
                    task_id = %task.task_id,
                    model = %result.model_name,
                    throughput = result.throughput_tokens_per_sec,
                    "benchmark completed"
                );
            }
            Err(err @ RunnerError::Persistence { .. }) => {
                // The computed result rides on the error so it is not
                // silently lost when the store misbehaves.
                error!(
                    worker_id,
                    task_id = %task.task_id,
                    model = %task.model_name,
                    error = ?err,
                    "benchmark result could not be persisted"
                );
            }
            Err(err) => {
                error!(
                    worker_id,
                    task_id = %task.task_id,
                    model = %task.model_name,
                    error = %err,
                    "benchmark failed"
                );
            }
        }
    }
    debug!(worker_id, "worker stopped");
}
