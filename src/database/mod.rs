// ABOUTME: Database layer executing prefix-typed statements on SQLite through sqlx
// ABOUTME: Placeholder handling, array expansion, row decoding, cursors and the executor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

//! # Statement execution
//!
//! A call to [`SqlExecutor::open`] runs through these steps:
//!
//! 1. connect lazily ([`SqlExecutor::connect`])
//! 2. expand array parameters ([`expansion::expand_arrays`])
//! 3. classify the statement by its leading keyword
//! 4. decode every parameter into a bound value
//! 5. compile `:name` placeholders to numbered parameters ([`placeholders::compile`])
//! 6. execute and shape the result as a [`QueryOutcome`]

/// Row cursor borrowing the connection
pub mod cursor;
/// Statement executor
pub mod executor;
/// Array parameter expansion
pub mod expansion;
/// Placeholder name sources for expansion
pub mod names;
/// Named placeholder scanning and compilation
pub mod placeholders;
/// Row decoding
pub mod rows;

pub use cursor::RowCursor;
pub use executor::{ExecOutput, QueryOutcome, SqlExecutor};
pub use expansion::{expand_arrays, ExpandedStatement};
pub use names::{PlaceholderNames, RandomNames, SequentialNames};
pub use rows::{row_to_map, Row};
