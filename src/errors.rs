// ABOUTME: Error types re-exported from the core crate plus sqlx error mapping
// ABOUTME: Converts driver errors into DatabaseError variants carrying statement context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

pub use sqlite_exec_core::errors::*;

use sqlite_exec_core::statement::ResultShape;
use std::borrow::Cow;

/// Map a failure of the execute step
///
/// Errors reported by `SQLite` itself keep their code and message; anything
/// else (I/O, worker shutdown) passes through as a driver error.
pub(crate) fn execution_error(error: sqlx::Error, shape: ResultShape, sql: &str) -> DatabaseError {
    match error {
        sqlx::Error::Database(db) => DatabaseError::Execution {
            code: db.code().map(Cow::into_owned),
            message: db.message().to_owned(),
            shape,
            sql: sql.to_owned(),
        },
        other => driver_error(other),
    }
}

/// Pass a driver error through unchanged
pub(crate) fn driver_error(error: sqlx::Error) -> DatabaseError {
    DatabaseError::Driver {
        message: error.to_string(),
        source: Some(Box::new(error)),
    }
}

/// Map a failure to open the database
pub(crate) fn connection_error(error: sqlx::Error, target: &str) -> DatabaseError {
    DatabaseError::Connection {
        reason: format!("cannot open {target}: {error}"),
        source: Some(Box::new(error)),
    }
}
