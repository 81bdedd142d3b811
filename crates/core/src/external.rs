// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Contracts for external collaborators.
//!
//! The benchmark core does not talk to source control or to the cluster
//! itself. It consumes two narrow interfaces, implemented elsewhere:
//!
//! - [`CommitLookup`] resolves the revision of the code under test
//! - [`ResourceInventory`] reports per-node GPU capacity on demand
//!
//! Both are object-safe async traits so callers can inject whatever
//! implementation their environment supports, including fixed values in
//! degraded environments.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by [`CommitLookup`] implementations.
#[derive(Debug, Error)]
pub enum CommitLookupError {
    /// No revision could be resolved from the configured source.
    #[error("no commit reference available: {0}")]
    Unavailable(String),
}

/// Errors raised by [`ResourceInventory`] implementations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// The inventory source could not be queried.
    #[error("resource inventory unavailable: {0}")]
    Unavailable(String),
}

/// Resolves the revision of the code under test.
///
/// The returned string is opaque to the benchmark core; it is stored on
/// every result as `commit_reference` and never validated here.
#[async_trait]
pub trait CommitLookup: Send + Sync {
    /// Return an opaque revision string.
    async fn resolve(&self) -> Result<String, CommitLookupError>;
}

/// GPU capacity of a single cluster node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuNodeResources {
    /// GPUs physically present on the node.
    pub total_gpus: u32,

    /// GPUs the scheduler may still allocate.
    pub allocatable_gpus: u32,
}

/// Read-only view of cluster GPU capacity.
///
/// Queried on demand; no caching behavior is imposed on implementations.
#[async_trait]
pub trait ResourceInventory: Send + Sync {
    /// Snapshot of node name to GPU counts.
    async fn snapshot(&self) -> Result<HashMap<String, GpuNodeResources>, InventoryError>;
}
