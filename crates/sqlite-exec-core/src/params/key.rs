// ABOUTME: Parameter key parsing into a closed set of parameter kinds
// ABOUTME: Splits `prefix-name` keys and maps prefix codes to ParamKind variants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

use crate::constants::{keys, prefixes};
use crate::errors::ParamError;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Declared kind of a prefixed parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// `d`
    Date,
    /// `s`
    Str,
    /// `b`
    Bool,
    /// `f`
    Float,
    /// `i`
    Int,
    /// `as`
    ArrayStr,
    /// `ai`
    ArrayInt,
    /// `ad`
    ArrayDate,
    /// `af`
    ArrayFloat,
}

/// Kind of a single bound value (array kinds reduce to one of these)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Date, bound as text
    Date,
    /// String
    Str,
    /// Boolean
    Bool,
    /// Float, bound as text
    Float,
    /// Integer
    Int,
}

impl ParamKind {
    /// Parse a prefix code, `None` when the code is unknown
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Some(match prefix {
            prefixes::DATE => Self::Date,
            prefixes::STRING => Self::Str,
            prefixes::BOOLEAN => Self::Bool,
            prefixes::FLOAT => Self::Float,
            prefixes::INTEGER => Self::Int,
            prefixes::ARRAY_STRING => Self::ArrayStr,
            prefixes::ARRAY_INTEGER => Self::ArrayInt,
            prefixes::ARRAY_DATE => Self::ArrayDate,
            prefixes::ARRAY_FLOAT => Self::ArrayFloat,
            _ => return None,
        })
    }

    /// Prefix code of this kind
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Date => prefixes::DATE,
            Self::Str => prefixes::STRING,
            Self::Bool => prefixes::BOOLEAN,
            Self::Float => prefixes::FLOAT,
            Self::Int => prefixes::INTEGER,
            Self::ArrayStr => prefixes::ARRAY_STRING,
            Self::ArrayInt => prefixes::ARRAY_INTEGER,
            Self::ArrayDate => prefixes::ARRAY_DATE,
            Self::ArrayFloat => prefixes::ARRAY_FLOAT,
        }
    }

    /// Whether the parameter expands into several placeholders
    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(
            self,
            Self::ArrayStr | Self::ArrayInt | Self::ArrayDate | Self::ArrayFloat
        )
    }

    /// Kind of each bound value
    #[must_use]
    pub const fn scalar(self) -> ScalarKind {
        match self {
            Self::Date | Self::ArrayDate => ScalarKind::Date,
            Self::Str | Self::ArrayStr => ScalarKind::Str,
            Self::Bool => ScalarKind::Bool,
            Self::Float | Self::ArrayFloat => ScalarKind::Float,
            Self::Int | Self::ArrayInt => ScalarKind::Int,
        }
    }
}

impl From<ScalarKind> for ParamKind {
    fn from(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Date => Self::Date,
            ScalarKind::Str => Self::Str,
            ScalarKind::Bool => Self::Bool,
            ScalarKind::Float => Self::Float,
            ScalarKind::Int => Self::Int,
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// A parsed parameter key
///
/// `kind` is `None` for keys without a delimiter; those bind as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamKey {
    /// Declared kind, if the key carried a prefix
    pub kind: Option<ParamKind>,
    /// Placeholder name without the `:` sigil
    pub name: String,
}

impl ParamKey {
    /// Key with a declared kind
    #[must_use]
    pub fn new(kind: ParamKind, name: impl Into<String>) -> Self {
        Self {
            kind: Some(kind),
            name: name.into(),
        }
    }

    /// Key without a prefix
    #[must_use]
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            kind: None,
            name: name.into(),
        }
    }

    /// Parse `prefix-name` or `name`
    ///
    /// The key is split on the first delimiter, so names may themselves
    /// contain `-`. Unknown prefixes are read as strings.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::EmptyName` when nothing follows the prefix or the key is empty
    pub fn parse(key: &str) -> Result<Self, ParamError> {
        let Some((prefix, name)) = key.split_once(keys::PREFIX_DELIMITER) else {
            if key.is_empty() {
                return Err(ParamError::EmptyName { key: String::new() });
            }
            return Ok(Self::untyped(key));
        };

        if name.is_empty() {
            return Err(ParamError::EmptyName {
                key: key.to_owned(),
            });
        }

        let kind = ParamKind::from_prefix(prefix).unwrap_or_else(|| {
            debug!(prefix = %prefix, key = %key, "Unknown parameter prefix, binding as string");
            ParamKind::Str
        });
        Ok(Self::new(kind, name))
    }

    /// Whether this key expands into several placeholders
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.kind.is_some_and(ParamKind::is_array)
    }

    /// Placeholder text as written in SQL (`:name`)
    #[must_use]
    pub fn placeholder(&self) -> String {
        format!("{}{}", keys::PLACEHOLDER_SIGIL, self.name)
    }
}

impl FromStr for ParamKey {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "{kind}{}{}", keys::PREFIX_DELIMITER, self.name),
            None => f.write_str(&self.name),
        }
    }
}
