// ABOUTME: Constants shared by the parameter codec, configuration and executor
// ABOUTME: Prefix codes, delimiters, environment variable names and defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

/// Parameter key syntax
pub mod keys {
    /// Separates the type prefix from the parameter name (`i-id`)
    pub const PREFIX_DELIMITER: char = '-';
    /// Marks a named placeholder in SQL text (`:id`)
    pub const PLACEHOLDER_SIGIL: char = ':';
    /// Joins an array parameter name to its generated token (`ids_3`)
    pub const GENERATED_NAME_SEPARATOR: char = '_';
}

/// Single-letter and array prefix codes
pub mod prefixes {
    /// Date, bound as text
    pub const DATE: &str = "d";
    /// String
    pub const STRING: &str = "s";
    /// Boolean
    pub const BOOLEAN: &str = "b";
    /// Float, bound as its textual representation
    pub const FLOAT: &str = "f";
    /// Integer
    pub const INTEGER: &str = "i";
    /// Array of strings
    pub const ARRAY_STRING: &str = "as";
    /// Array of integers
    pub const ARRAY_INTEGER: &str = "ai";
    /// Array of dates
    pub const ARRAY_DATE: &str = "ad";
    /// Array of floats
    pub const ARRAY_FLOAT: &str = "af";
}

/// Literals accepted for `b`-prefixed parameters after trimming and lowercasing
pub mod booleans {
    /// Text that decodes to `true`
    pub const TRUE_LITERALS: &[&str] = &["true", "1", "yes", "on", "t", "y"];
    /// Text that decodes to `false`
    pub const FALSE_LITERALS: &[&str] = &["false", "0", "no", "off", "f", "n"];
}

/// Environment variables read by `DatabaseConfig::from_env`
pub mod env_vars {
    /// Database file location
    pub const PATH: &str = "SQLITE_EXEC_PATH";
    /// Client text encoding
    pub const CHARSET: &str = "SQLITE_EXEC_CHARSET";
    /// Create the database file when it does not exist
    pub const CREATE_IF_MISSING: &str = "SQLITE_EXEC_CREATE_IF_MISSING";
    /// Busy timeout in milliseconds
    pub const BUSY_TIMEOUT_MS: &str = "SQLITE_EXEC_BUSY_TIMEOUT_MS";
    /// Reject parameters that no placeholder references
    pub const REJECT_UNUSED_PARAMS: &str = "SQLITE_EXEC_REJECT_UNUSED_PARAMS";
}

/// Database defaults
pub mod database {
    /// Connection string used when no path is configured
    pub const MEMORY_URL: &str = "sqlite::memory:";
    /// URL scheme for file databases
    pub const URL_SCHEME: &str = "sqlite:";
    /// Busy timeout in milliseconds
    pub const BUSY_TIMEOUT_MS: u64 = 5_000;
    /// Upper bound on attempts to find a fresh generated placeholder name
    pub const MAX_NAME_ATTEMPTS: usize = 64;
}

/// Service identity used in structured logs
pub mod service_names {
    /// Name reported by the logging layer
    pub const SQLITE_EXEC: &str = "sqlite-exec";
}
