// ABOUTME: Configuration module for the statement executor
// ABOUTME: Environment-only configuration of the SQLite connection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

//! Configuration
//!
//! Configuration is read from environment variables or built in code; there
//! are no configuration files.

/// `SQLite` connection configuration
pub mod database;

pub use database::{Charset, DatabaseConfig};
