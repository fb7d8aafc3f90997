// ABOUTME: Database configuration for SQLite connections
// ABOUTME: Handles file path, client charset, busy timeout and parameter binding policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use sqlite_exec_core::constants::{database, env_vars};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Text encoding applied through `PRAGMA encoding`
///
/// `SQLite` only honours the pragma on a database that has no content yet;
/// on an existing file it is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Charset {
    /// UTF-8
    Utf8,
    /// UTF-16 in native byte order
    Utf16,
    /// UTF-16 little endian
    Utf16Le,
    /// UTF-16 big endian
    Utf16Be,
}

impl Charset {
    /// Name as `SQLite` spells it
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16 => "UTF-16",
            Self::Utf16Le => "UTF-16le",
            Self::Utf16Be => "UTF-16be",
        }
    }

    /// Quoted pragma value
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Utf8 => "'UTF-8'",
            Self::Utf16 => "'UTF-16'",
            Self::Utf16Le => "'UTF-16le'",
            Self::Utf16Be => "'UTF-16be'",
        }
    }
}

impl FromStr for Charset {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "utf8" => Ok(Self::Utf8),
            "utf16" => Ok(Self::Utf16),
            "utf16le" => Ok(Self::Utf16Le),
            "utf16be" => Ok(Self::Utf16Be),
            _ => Err(AppError::config(format!(
                "Unsupported charset '{s}' (expected UTF-8, UTF-16, UTF-16le or UTF-16be)"
            ))),
        }
    }
}

impl Display for Charset {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Connection configuration for the statement executor
///
/// Both `path` and `charset` are optional; an empty configuration opens a
/// private in-memory database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file location, `None` for an in-memory database
    pub path: Option<PathBuf>,
    /// Client text encoding
    pub charset: Option<Charset>,
    /// Create the database file when it does not exist
    pub create_if_missing: bool,
    /// How long to wait on a locked database before failing (milliseconds)
    pub busy_timeout_ms: u64,
    /// Treat parameters that no placeholder references as a binding error
    pub reject_unused_params: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            charset: None,
            create_if_missing: true,
            busy_timeout_ms: database::BUSY_TIMEOUT_MS,
            reject_unused_params: false,
        }
    }
}

impl DatabaseConfig {
    /// In-memory database with defaults
    #[must_use]
    pub fn memory() -> Self {
        Self::default()
    }

    /// File database with defaults
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Set the client charset
    #[must_use]
    pub const fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = Some(charset);
        self
    }

    /// Set the unused-parameter policy
    #[must_use]
    pub const fn with_reject_unused_params(mut self, reject: bool) -> Self {
        self.reject_unused_params = reject;
        self
    }

    /// Build from the `{path, charset}` option mapping
    ///
    /// Empty values count as absent. Unknown options are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the charset is not supported
    pub fn from_options<I, K, V>(options: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in options {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "path" if !value.is_empty() => config.path = Some(PathBuf::from(value)),
                "charset" if !value.is_empty() => config.charset = Some(value.parse()?),
                "path" | "charset" => {}
                other => debug!(option = %other, "Ignoring unknown database option"),
            }
        }
        Ok(config)
    }

    /// Load database configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if database environment variables are invalid
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::from_options([
            ("path", env::var(env_vars::PATH).unwrap_or_default()),
            ("charset", env::var(env_vars::CHARSET).unwrap_or_default()),
        ])?;

        config.create_if_missing = env_var_or(env_vars::CREATE_IF_MISSING, "true")
            .parse()
            .map_err(|e| {
                AppError::config(format!("Invalid {} value: {e}", env_vars::CREATE_IF_MISSING))
            })?;
        config.busy_timeout_ms = env_var_or(
            env_vars::BUSY_TIMEOUT_MS,
            &database::BUSY_TIMEOUT_MS.to_string(),
        )
        .parse()
        .map_err(|e| AppError::config(format!("Invalid {} value: {e}", env_vars::BUSY_TIMEOUT_MS)))?;
        config.reject_unused_params = env_var_or(env_vars::REJECT_UNUSED_PARAMS, "false")
            .parse()
            .map_err(|e| {
                AppError::config(format!(
                    "Invalid {} value: {e}",
                    env_vars::REJECT_UNUSED_PARAMS
                ))
            })?;

        Ok(config)
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        self.path.is_none()
    }

    /// Busy timeout as a duration
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Convert to connection string
    #[must_use]
    pub fn connection_string(&self) -> String {
        self.path.as_ref().map_or_else(
            || database::MEMORY_URL.to_owned(),
            |path| format!("{}{}", database::URL_SCHEME, path.display()),
        )
    }
}

impl Display for DatabaseConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.connection_string())
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
