// Copyright 2025 ModelBench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Indexed benchmark-result storage.
//!
//! This crate provides the [`ResultStore`] contract consumed by the
//! benchmark runner and worker pool, and its SQLite-backed implementation.
//! The store serves three access patterns, each backed by its own index:
//!
//! - per-model history, newest first
//! - per-revision lookups
//! - leaderboard queries, best throughput first
//!
//! # Modules
//!
//! - [`store`] - The `ResultStore` trait and error taxonomy
//! - [`sqlite`] - The sqlx/SQLite implementation

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod sqlite;
pub mod store;

pub use sqlite::SqliteResultStore;
pub use store::{ResultStore, StoreError};
