// ABOUTME: Token sources for placeholder names generated during array expansion
// ABOUTME: Sequential per-statement counter by default, random hex tokens on request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

use rand::Rng;

/// Supplies the uniqueness token appended to expanded array parameter names
///
/// The executor calls [`PlaceholderNames::reset`] before expanding each
/// statement, so a source only has to be unique within one statement.
pub trait PlaceholderNames: Send {
    /// Next token; successive calls between resets must differ
    fn next_token(&mut self) -> String;

    /// Start a new statement
    fn reset(&mut self) {}
}

/// Counter restarting at 1 for every statement
///
/// Identical calls produce identical SQL, which keeps the driver's prepared
/// statement cache effective.
#[derive(Debug, Default, Clone)]
pub struct SequentialNames {
    next: u64,
}

impl SequentialNames {
    /// New counter
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }
}

impl PlaceholderNames for SequentialNames {
    fn next_token(&mut self) -> String {
        self.next += 1;
        self.next.to_string()
    }

    fn reset(&mut self) {
        self.next = 0;
    }
}

/// Random 32-bit hex tokens
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNames;

impl PlaceholderNames for RandomNames {
    fn next_token(&mut self) -> String {
        format!("{:08x}", rand::thread_rng().gen::<u32>())
    }
}
