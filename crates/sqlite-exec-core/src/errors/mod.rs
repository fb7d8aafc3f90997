// ABOUTME: Unified error handling for the statement helper
// ABOUTME: Defines ErrorCode, AppError and re-exports the domain error types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

//! # Unified Error Handling
//!
//! Domain code returns `DatabaseError` (executor) or `ParamError` (codec).
//! Both convert into `AppError`, which carries a stable `ErrorCode` for hosts
//! that want a single error type at their boundary.

/// Errors raised while connecting, binding or executing statements
pub mod database;

/// Errors raised while decoding prefixed parameters
pub mod param;

pub use database::{DatabaseError, DatabaseResult};
pub use param::ParamError;

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Caller input is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A parameter value could not be converted to its declared type
    #[serde(rename = "INVALID_PARAMETER")]
    InvalidParameter = 3001,
    /// A placeholder could not be bound
    #[serde(rename = "BINDING_FAILED")]
    BindingFailed = 3002,
    /// The statement's leading keyword is not recognized
    #[serde(rename = "UNRECOGNIZED_STATEMENT")]
    UnrecognizedStatement = 3003,

    // Configuration (6000-6999)
    /// Configuration is invalid
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// The driver reported an error
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    /// No usable connection could be established
    #[serde(rename = "CONNECTION_FAILED")]
    ConnectionFailed = 9002,
    /// Executing a prepared statement failed
    #[serde(rename = "EXECUTION_FAILED")]
    ExecutionFailed = 9003,
    /// A row value could not be decoded
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9004,
}

impl ErrorCode {
    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidParameter => "A statement parameter has an invalid value",
            Self::BindingFailed => "A statement parameter could not be bound",
            Self::UnrecognizedStatement => "The statement type is not recognized",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::ConnectionFailed => "No usable database connection",
            Self::ExecutionFailed => "Statement execution failed",
            Self::SerializationError => "Row value could not be decoded",
        }
    }

    /// Whether the error is caused by the caller rather than the database
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput
                | Self::InvalidParameter
                | Self::BindingFailed
                | Self::UnrecognizedStatement
                | Self::ConfigInvalid
        )
    }
}

/// Unified error type
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid configuration
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl From<ParamError> for AppError {
    fn from(error: ParamError) -> Self {
        Self::new(ErrorCode::InvalidParameter, error.to_string()).with_source(error)
    }
}

impl From<DatabaseError> for AppError {
    fn from(error: DatabaseError) -> Self {
        let code = match &error {
            DatabaseError::Connection { .. } => ErrorCode::ConnectionFailed,
            DatabaseError::UnrecognizedStatement { .. } => ErrorCode::UnrecognizedStatement,
            DatabaseError::Execution { .. } => ErrorCode::ExecutionFailed,
            DatabaseError::Binding { .. } => ErrorCode::BindingFailed,
            DatabaseError::Parameter(_) => ErrorCode::InvalidParameter,
            DatabaseError::Decode { .. } => ErrorCode::SerializationError,
            DatabaseError::Driver { .. } => ErrorCode::DatabaseError,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}
