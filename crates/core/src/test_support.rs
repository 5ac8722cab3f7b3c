// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::position::{Location, Position};
use crate::symbol::{SymbolDescriptor, SymbolKind};

pub fn pos(file: &str, line: u32, column: u32) -> Position {
    Position { file: file.to_string(), line, column }
}

pub fn method_symbol(name: &str, full_name: &str, location: Location) -> SymbolDescriptor {
    SymbolDescriptor {
        name: name.to_string(),
        kind: SymbolKind::Method,
        full_name: full_name.to_string(),
        signature: None,
        documentation: None,
        containing_type: None,
        containing_namespace: None,
        return_type: None,
        accessibility: None,
        modifiers: vec![],
        location: Some(location),
    }
}
