// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Resource inventory adapters.

use async_trait::async_trait;
use modelbench_core::external::{GpuNodeResources, InventoryError, ResourceInventory};
use std::collections::HashMap;

/// Resource inventory serving a fixed node capacity table.
///
/// Stands in for a cluster API in development and test environments; the
/// snapshot is whatever the table was built with.
#[derive(Debug, Clone, Default)]
pub struct StaticResourceInventory {
    nodes: HashMap<String, GpuNodeResources>,
}

impl StaticResourceInventory {
    /// Inventory over an explicit node table.
    pub fn new(nodes: HashMap<String, GpuNodeResources>) -> Self {
        Self { nodes }
    }

    /// Add one node to the table.
    pub fn with_node(mut self, name: impl Into<String>, total_gpus: u32, allocatable_gpus: u32) -> Self {
        self.nodes.insert(
            name.into(),
            GpuNodeResources {
                total_gpus,
                allocatable_gpus,
            },
        );
        self
    }
}

#[async_trait]
impl ResourceInventory for StaticResourceInventory {
    async fn snapshot(&self) -> Result<HashMap<String, GpuNodeResources>, InventoryError> {
        Ok(self.nodes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_returns_configured_nodes() {
        let inventory = StaticResourceInventory::default()
            .with_node("gpu-node-1", 8, 6)
            .with_node("gpu-node-2", 4, 4);

        let snapshot = inventory.snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot["gpu-node-1"],
            GpuNodeResources {
                total_gpus: 8,
                allocatable_gpus: 6,
            }
        );
    }

    #[tokio::test]
    async fn test_empty_inventory_yields_empty_snapshot() {
        let inventory = StaticResourceInventory::default();
        assert!(inventory.snapshot().await.unwrap().is_empty());
    }
}
