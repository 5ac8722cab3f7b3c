// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `{id, result}` | `{id, error}` response envelope (§3, §6).
//!
//! Exactly one of `result`/`error` is ever present — modeled as an untagged
//! two-variant payload rather than two optional fields, so a malformed
//! response with both or neither cannot be constructed.

use serde::{Deserialize, Serialize};

use crate::error_code::ProtocolErrorCode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ErrorObject {
    pub fn from_protocol(code: ProtocolErrorCode, message: impl Into<String>) -> Self {
        Self { code: code.code(), message: message.into(), data: None }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Result { result: serde_json::Value },
    Error { error: ErrorObject },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    #[serde(default = "jsonrpc_version")]
    pub jsonrpc: String,
    pub id: String,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

fn jsonrpc_version() -> String {
    "2.0".to_string()
}

impl Response {
    pub fn result(id: impl Into<String>, result: serde_json::Value) -> Self {
        Self { jsonrpc: jsonrpc_version(), id: id.into(), payload: ResponsePayload::Result { result } }
    }

    pub fn error(id: impl Into<String>, error: ErrorObject) -> Self {
        Self { jsonrpc: jsonrpc_version(), id: id.into(), payload: ResponsePayload::Error { error } }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, ResponsePayload::Error { .. })
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
