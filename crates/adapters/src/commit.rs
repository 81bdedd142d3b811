// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Commit lookup adapters.
//!
//! Both adapters resolve the `commit_reference` stamped onto every
//! benchmark result without talking to a source-control API: one returns
//! a fixed string, the other reads the revision the CI environment
//! exported.

use async_trait::async_trait;
use modelbench_core::external::{CommitLookup, CommitLookupError};
use tracing::debug;

/// Default environment variable consulted by [`EnvCommitLookup`].
pub const DEFAULT_COMMIT_ENV_VAR: &str = "MODELBENCH_COMMIT_SHA";

/// Commit lookup returning a fixed revision string.
#[derive(Debug, Clone)]
pub struct StaticCommitLookup {
    commit_reference: String,
}

impl StaticCommitLookup {
    /// Always resolve to `commit_reference`.
    pub fn new(commit_reference: impl Into<String>) -> Self {
        Self {
            commit_reference: commit_reference.into(),
        }
    }
}

#[async_trait]
impl CommitLookup for StaticCommitLookup {
    async fn resolve(&self) -> Result<String, CommitLookupError> {
        Ok(self.commit_reference.clone())
    }
}

/// Commit lookup reading the revision from an environment variable.
///
/// CI systems export the revision under test; this adapter picks it up
/// at resolve time, so long-running processes observe redeployments.
#[derive(Debug, Clone)]
pub struct EnvCommitLookup {
    var: String,
}

impl Default for EnvCommitLookup {
    fn default() -> Self {
        Self::new(DEFAULT_COMMIT_ENV_VAR)
    }
}

impl EnvCommitLookup {
    /// Read the revision from `var`.
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl CommitLookup for EnvCommitLookup {
    async fn resolve(&self) -> Result<String, CommitLookupError> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => {
                debug!(var = %self.var, "resolved commit reference from environment");
                Ok(value)
            }
            _ => Err(CommitLookupError::Unavailable(format!(
                "{} is unset or empty",
                self.var
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_lookup_returns_configured_value() {
        let lookup = StaticCommitLookup::new("abc123def456");
        assert_eq!(lookup.resolve().await.unwrap(), "abc123def456");
    }

    #[tokio::test]
    async fn test_env_lookup_reads_variable() {
        std::env::set_var("MODELBENCH_TEST_SHA_SET", "deadbeef");
        let lookup = EnvCommitLookup::new("MODELBENCH_TEST_SHA_SET");
        assert_eq!(lookup.resolve().await.unwrap(), "deadbeef");
    }

    #[tokio::test]
    async fn test_env_lookup_fails_when_unset() {
        let lookup = EnvCommitLookup::new("MODELBENCH_TEST_SHA_UNSET");
        let err = lookup.resolve().await.unwrap_err();
        assert!(matches!(err, CommitLookupError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_env_lookup_rejects_blank_value() {
        std::env::set_var("MODELBENCH_TEST_SHA_BLANK", "   ");
        let lookup = EnvCommitLookup::new("MODELBENCH_TEST_SHA_BLANK");
        assert!(lookup.resolve().await.is_err());
    }
}
