// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy (§4.3, §7): protocol-level JSON-RPC codes vs
//! application-level outcome codes. The two are never mixed — application
//! outcomes ride in a successful response's `result` envelope.

/// JSON-RPC reserved error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
}

impl ProtocolErrorCode {
    pub fn code(self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ParseError => "parse_error",
            Self::InvalidRequest => "invalid_request",
            Self::MethodNotFound => "method_not_found",
            Self::InvalidParams => "invalid_params",
            Self::InternalError => "internal_error",
        }
    }
}

/// Application-level query outcomes. These are never JSON-RPC errors (§4.3);
/// they appear as `error_code` inside a successful envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationErrorCode {
    DocumentNotFound,
    SymbolNotFound,
}

impl ApplicationErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DocumentNotFound => "document_not_found",
            Self::SymbolNotFound => "symbol_not_found",
        }
    }
}
