// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Runtime configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the tracker: queue sizing, worker fan-out, and the
/// storage endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Maximum number of pending tasks before `submit` applies
    /// backpressure.
    pub queue_capacity: usize,

    /// Number of concurrent benchmark workers started by default.
    pub worker_count: usize,

    /// How long a worker waits for a task before re-checking whether the
    /// pool is shutting down. Bounds shutdown latency.
    pub poll_timeout_ms: u64,

    /// Database the result store connects to.
    pub database_url: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            worker_count: 4,
            poll_timeout_ms: 1_000,
            database_url: "sqlite://modelbench.db".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Worker poll timeout as a [`Duration`].
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_millis(self.poll_timeout_ms)
    }
}
