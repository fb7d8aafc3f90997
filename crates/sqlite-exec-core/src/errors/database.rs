// ABOUTME: Structured error types for statement execution
// ABOUTME: Connection, classification, binding, execution and decode failures with context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

use super::ParamError;
use crate::statement::ResultShape;
use std::error::Error as StdError;
use thiserror::Error;

/// Errors raised by the executor
///
/// Every variant that concerns a statement carries the SQL text as it was sent
/// to the driver (after array expansion) so failures can be diagnosed from the
/// error alone.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// No usable connection after a connect attempt
    #[error("no usable connection: {reason}")]
    Connection {
        /// What went wrong
        reason: String,
        /// Driver error, if any
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },

    /// The statement's leading keyword is not one the classifier knows
    #[error("unrecognized statement type{}: {sql}", .keyword.as_deref().map(|k| format!(" '{k}'")).unwrap_or_default())]
    UnrecognizedStatement {
        /// Leading keyword, if one was found
        keyword: Option<String>,
        /// Statement text
        sql: String,
    },

    /// The driver failed to execute the statement
    #[error("execution failed [code {}] {message} (shape {shape}): {sql}", .code.as_deref().unwrap_or("none"))]
    Execution {
        /// Driver error code
        code: Option<String>,
        /// Driver error message
        message: String,
        /// Classification computed before execution
        shape: ResultShape,
        /// Statement text
        sql: String,
    },

    /// A placeholder could not be bound
    #[error("cannot bind :{placeholder}: {reason}: {sql}")]
    Binding {
        /// Placeholder name
        placeholder: String,
        /// What went wrong
        reason: String,
        /// Statement text
        sql: String,
    },

    /// A parameter value failed to decode
    #[error(transparent)]
    Parameter(#[from] ParamError),

    /// A row value could not be decoded
    #[error("cannot decode column '{column}': {message}")]
    Decode {
        /// Column name
        column: String,
        /// What went wrong
        message: String,
    },

    /// Any other driver error, passed through unchanged
    #[error("database error: {message}")]
    Driver {
        /// Driver error message
        message: String,
        /// Driver error
        #[source]
        source: Option<Box<dyn StdError + Send + Sync>>,
    },
}

impl DatabaseError {
    /// Connection failure without an underlying driver error
    #[must_use]
    pub fn connection(reason: impl Into<String>) -> Self {
        Self::Connection {
            reason: reason.into(),
            source: None,
        }
    }

    /// Binding failure for a placeholder
    #[must_use]
    pub fn binding(
        placeholder: impl Into<String>,
        reason: impl Into<String>,
        sql: impl Into<String>,
    ) -> Self {
        Self::Binding {
            placeholder: placeholder.into(),
            reason: reason.into(),
            sql: sql.into(),
        }
    }

    /// Driver error code for execution failures
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Execution { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Result type alias for executor operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
