// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bounded FIFO hand-off between producers and workers.
//!
//! The queue wraps a bounded tokio mpsc channel. The sender side gives
//! producers backpressure for free: `submit` suspends while the channel
//! is full. The receiver side is shared by every worker behind an async
//! mutex, so concurrent `take` calls are serialized and each task is
//! delivered to exactly one worker, in submission order.

use modelbench_core::BenchmarkTask;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

/// Errors raised by queue operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// The consumer side has been torn down; no task can be delivered.
    #[error("task queue is closed")]
    Closed,
}

/// Bounded, ordered holding area for pending benchmark tasks.
pub struct TaskQueue {
    tx: mpsc::Sender<BenchmarkTask>,
    rx: Mutex<mpsc::Receiver<BenchmarkTask>>,
    pending: AtomicUsize,
}

impl TaskQueue {
    /// Create a queue holding at most `capacity` outstanding tasks.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be positive");
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Mutex::new(rx),
            pending: AtomicUsize::new(0),
        }
    }

    /// Enqueue a task, suspending while the queue is at capacity.
    ///
    /// Backpressure, not rejection: the call only fails if the queue has
    /// been closed underneath the producer.
    pub async fn submit(&self, task: BenchmarkTask) -> Result<(), QueueError> {
        self.tx.send(task).await.map_err(|_| QueueError::Closed)?;
        self.pending.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// Dequeue the oldest pending task, waiting at most `timeout`.
    ///
    /// Returns `None` when no task arrived in time. Workers use that
    /// outcome to re-check for shutdown instead of blocking forever.
    pub async fn take(&self, timeout: Duration) -> Option<BenchmarkTask> {
        let mut rx = self.rx.lock().await;
        match tokio::time::timeout(timeout, rx.recv()).await {
            Ok(Some(task)) => {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                Some(task)
            }
            // Closed channel and timeout look the same to a worker.
            Ok(None) | Err(_) => None,
        }
    }

    /// Number of tasks currently waiting in the queue.
    ///
    /// Counts queued tasks only; a task a worker is executing is no
    /// longer pending.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}
