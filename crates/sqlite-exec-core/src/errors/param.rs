// ABOUTME: Error types for prefixed parameter decoding
// ABOUTME: Raised before any SQL reaches the driver
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

use thiserror::Error;

/// Errors produced while decoding a `(key, value)` pair into a bound parameter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// The key has a prefix but nothing after the delimiter
    #[error("parameter key '{key}' has an empty name")]
    EmptyName {
        /// The offending key
        key: String,
    },
    /// A `b`-prefixed value is not a recognized boolean literal
    #[error("parameter '{name}' expects a boolean, got '{value}'")]
    InvalidBoolean {
        /// Parameter name without prefix
        name: String,
        /// The value as supplied
        value: String,
    },
    /// A list was supplied for a scalar prefix
    #[error("parameter '{name}' is scalar but a list was supplied")]
    UnexpectedList {
        /// Parameter name without prefix
        name: String,
    },
    /// An array element is itself a list
    #[error("array parameter '{name}' contains a nested list")]
    NestedList {
        /// Parameter name without prefix
        name: String,
    },
}
