// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark execution for ModelBench.
//!
//! This crate owns the moving parts of the tracker: the bounded FIFO
//! [`TaskQueue`], the [`WorkerPool`] that fans tasks out to concurrent
//! workers, the [`BenchmarkRunner`] each worker invokes, and the
//! [`Tracker`] facade tying them to a result store.
//!
//! # Data flow
//!
//! ```text
//! submit_task -> TaskQueue -> worker -> BenchmarkRunner -> ResultStore
//! ```
//!
//! Producers block when the queue is full (backpressure, never rejection).
//! Workers poll the queue with a bounded timeout so a stop request is
//! observed within roughly one poll interval; a task that is already
//! executing always runs to completion.
//!
//! # Modules
//!
//! - [`executor`] - The pluggable benchmark-execution seam
//! - [`runner`] - Single-task execution and the error taxonomy
//! - [`queue`] - Bounded FIFO hand-off between producers and workers
//! - [`pool`] - Worker lifecycle (start, drain, stop)
//! - [`tracker`] - The externally exposed facade

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod executor;
pub mod pool;
pub mod queue;
pub mod runner;
pub mod tracker;

pub use executor::{BenchmarkExecutor, ExecutionMetrics, ExecutorError, SimulatedExecutor};
pub use pool::WorkerPool;
pub use queue::{QueueError, TaskQueue};
pub use runner::{BenchmarkRunner, RunnerError};
pub use tracker::Tracker;
