// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Position and Location (§3): 1-based file coordinates.

use serde::{Deserialize, Serialize};

/// A `(file, line, column)` triple, 1-based, as supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

/// A position (optionally a span) rendered for clients.
///
/// `file` is relative to the snapshot root when the target lies beneath it,
/// otherwise the canonical absolute path (§3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl Location {
    pub fn point(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self { file: file.into(), line, column, end_line: None, end_column: None }
    }

    pub fn span(file: impl Into<String>, line: u32, column: u32, end_line: u32, end_column: u32) -> Self {
        Self { file: file.into(), line, column, end_line: Some(end_line), end_column: Some(end_column) }
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod tests;
