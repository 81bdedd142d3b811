// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Queued benchmark requests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pending benchmark request: a model paired with the input corpus it
/// will be measured against.
///
/// A task is owned by the queue while pending and moves to exactly one
/// worker on dequeue. The type is deliberately not `Clone`: a task that
/// could be duplicated could also be executed twice.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkTask {
    /// Correlates the submission with worker log lines.
    #[serde(default = "Uuid::new_v4")]
    pub task_id: Uuid,

    /// Model to benchmark.
    pub model_name: String,

    /// Ordered input corpus fed to the execution step.
    pub test_dataset: Vec<String>,
}

impl BenchmarkTask {
    /// Create a new task with a fresh identifier.
    pub fn new(model_name: impl Into<String>, test_dataset: Vec<String>) -> Self {
        Self {
            task_id: Uuid::new_v4(),
            model_name: model_name.into(),
            test_dataset,
        }
    }
}
