// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup, executor construction and table fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `sqlite_exec`

use anyhow::Result;
use sqlite_exec::{DatabaseConfig, Params, SqlExecutor};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// In-memory executor with default configuration
pub fn memory_executor() -> SqlExecutor {
    init_test_logging();
    SqlExecutor::new(DatabaseConfig::memory())
}

/// In-memory executor with a `t (id INTEGER PRIMARY KEY, x TEXT)` table
pub async fn executor_with_table() -> Result<SqlExecutor> {
    let mut db = memory_executor();
    db.exec(
        "CREATE TABLE t (id INTEGER PRIMARY KEY, x TEXT)",
        Params::new(),
    )
    .await?;
    Ok(db)
}

/// Insert rows with the given `x` values, ids start at 1
pub async fn seed(db: &mut SqlExecutor, values: &[&str]) -> Result<()> {
    for value in values {
        db.exec("INSERT INTO t (x) VALUES (:x)", [("s-x", *value)])
            .await?;
    }
    Ok(())
}
