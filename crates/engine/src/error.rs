// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Failures the dispatcher turns into a JSON-RPC protocol-level error
/// response, never an application-level envelope (§4.3, §4.6).
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("invalid params for {method}: {reason}")]
    InvalidParams { method: String, reason: String },
}
