// ABOUTME: Main library entry point for the sqlite-exec statement helper
// ABOUTME: Runs SQL with prefix-typed named parameters on SQLite and shapes results by statement kind
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

#![deny(unsafe_code)]

//! # sqlite-exec
//!
//! A thin execution helper over one `SQLite` connection. Callers pass SQL with
//! `:name` placeholders and a parameter mapping whose keys carry a type prefix
//! (`i-id`, `s-title`, `ai-ids`, ...). The helper expands array parameters,
//! binds every value with the storage type its prefix declares, and shapes the
//! result by the statement's leading keyword.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sqlite_exec::{DatabaseConfig, Params, SqlExecutor};
//!
//! # async fn run() -> sqlite_exec::errors::DatabaseResult<()> {
//! let mut db = SqlExecutor::new(DatabaseConfig::memory());
//! db.exec("CREATE TABLE t (id INTEGER PRIMARY KEY, x TEXT)", Params::new()).await?;
//!
//! let inserted = db.exec("INSERT INTO t (x) VALUES (:x)", [("s-x", "hi")]).await?;
//! assert_eq!(inserted.last_insert_id(), Some(1));
//!
//! let rows = db
//!     .fetch_all("SELECT * FROM t WHERE id IN (:ids)", [("ai-ids", vec![1, 2])])
//!     .await?;
//! assert_eq!(rows.len(), 1);
//! # Ok(())
//! # }
//! ```

/// Connection configuration
pub mod config;

/// Statement execution on `SQLite`
pub mod database;

/// Error types and driver error mapping
pub mod errors;

/// Structured logging setup
pub mod logging;

pub use config::{Charset, DatabaseConfig};
pub use database::{ExecOutput, QueryOutcome, Row, RowCursor, SqlExecutor};
pub use sqlite_exec_core::params::{ParamKind, ParamValue, Params};
pub use sqlite_exec_core::statement::{classify, ResultShape};
