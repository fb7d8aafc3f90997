// ABOUTME: Statement classification by leading SQL keyword
// ABOUTME: Decides whether a statement yields rows, a row count, an inserted id or nothing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

//! Statement classification
//!
//! The executor shapes its return value from the statement's first keyword
//! alone. Classification happens before execution, so an unrecognized
//! statement never reaches the driver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result shape of a statement, derived from its leading keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultShape {
    /// Produces rows (`SELECT`, `SHOW`, `EXPLAIN`, `WITH`, `DESCRIBE`)
    Rows,
    /// Produces an affected-row count (`UPDATE`, `SET`, `DELETE`)
    RowCount,
    /// Produces the id of the last inserted row (`INSERT`, `REPLACE`, `LOAD`)
    InsertedId,
    /// Produces nothing (DDL, maintenance and session statements)
    NoReturn,
    /// Leading keyword is not known
    Unrecognized,
}

impl ResultShape {
    /// Shape for an already extracted keyword (case-insensitive)
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_uppercase().as_str() {
            "SELECT" | "SHOW" | "EXPLAIN" | "WITH" | "DESCRIBE" => Self::Rows,
            "INSERT" | "REPLACE" | "LOAD" => Self::InsertedId,
            "UPDATE" | "SET" | "DELETE" => Self::RowCount,
            "TRUNCATE" | "DROP" | "KILL" | "LOCK" | "UNLOCK" | "CREATE" | "OPTIMIZE" | "ALTER"
            | "VACUUM" | "REINDEX" | "ANALYZE" | "IMPORT" | "CALL" => Self::NoReturn,
            _ => Self::Unrecognized,
        }
    }

    /// Whether executing a statement of this shape is allowed
    #[must_use]
    pub const fn is_recognized(self) -> bool {
        !matches!(self, Self::Unrecognized)
    }

    /// Stable lowercase label used in logs and error messages
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rows => "rows",
            Self::RowCount => "row_count",
            Self::InsertedId => "inserted_id",
            Self::NoReturn => "no_return",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for ResultShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a statement by its leading keyword
#[must_use]
pub fn classify(sql: &str) -> ResultShape {
    leading_keyword(sql).map_or(ResultShape::Unrecognized, ResultShape::from_keyword)
}

/// First word made only of ASCII letters, after skipping leading comments
///
/// Words are maximal runs of `[A-Za-z0-9_]`; a run mixing digits or
/// underscores with letters (`1abc`, `t_1`) is not a keyword and is skipped.
#[must_use]
pub fn leading_keyword(sql: &str) -> Option<&str> {
    let body = skip_leading_comments(sql);
    body.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .find(|word| !word.is_empty() && word.bytes().all(|b| b.is_ascii_alphabetic()))
}

fn skip_leading_comments(sql: &str) -> &str {
    let mut rest = sql.trim_start();
    loop {
        if let Some(line) = rest.strip_prefix("--") {
            rest = line.find('\n').map_or("", |end| &line[end + 1..]);
        } else if let Some(block) = rest.strip_prefix("/*") {
            rest = block.find("*/").map_or("", |end| &block[end + 2..]);
        } else {
            return rest;
        }
        rest = rest.trim_start();
    }
}
