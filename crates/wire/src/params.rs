// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-method request params (§4.6 table).

use rq_core::Position;
use serde::{Deserialize, Serialize};

/// Params for `references`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencesParams {
    #[serde(flatten)]
    pub position: Position,
    #[serde(default)]
    pub include_definition: bool,
}

/// Params for `diagnostics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsParams {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_true")]
    pub include_warnings: bool,
    #[serde(default)]
    pub include_info: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DiagnosticsParams {
    fn default() -> Self {
        Self { file: None, include_warnings: true, include_info: false }
    }
}
