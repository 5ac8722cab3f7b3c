// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol for daemon communication (§4.2, §4.3, §6).
//!
//! Wire format: 4-byte length prefix (little-endian) + UTF-8 JSON payload.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod envelope;
mod error_code;
mod params;
mod request;
mod response;

pub use codec::{normalize_keys, read_frame, write_frame, CodecError, MAX_FRAME_LEN};
pub use envelope::{
    DefinitionEnvelope, DiagnosticsEnvelope, LocationsEnvelope, PingEnvelope, ShutdownEnvelope,
    SymbolEnvelope,
};
pub use error_code::{ApplicationErrorCode, ProtocolErrorCode};
pub use params::{DiagnosticsParams, ReferencesParams};
pub use request::Request;
pub use response::{ErrorObject, Response, ResponsePayload};
