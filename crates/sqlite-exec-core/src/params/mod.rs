// ABOUTME: Prefixed statement parameters: keys, caller values and decoding
// ABOUTME: Re-exports the key parser, value model and the codec producing bound parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

//! # Prefixed Parameters
//!
//! Callers name parameters `[prefix-]name`. The prefix declares how the value
//! is typed when it is bound:
//!
//! | prefix | kind | bound as |
//! |--------|------|----------|
//! | `s`, `d` | string, date | text |
//! | `f` | float | text (keeps precision) |
//! | `i` | integer | integer, or text when out of range |
//! | `b` | boolean | boolean |
//! | `as`, `ai`, `ad`, `af` | arrays | expanded into one placeholder per element |
//!
//! A key without a prefix binds as text.

mod codec;
mod key;
mod value;

pub use codec::{decode, decode_key, BoundParameter, BoundValue, StorageType};
pub use key::{ParamKey, ParamKind, ScalarKind};
pub use value::{ParamValue, Params};
