// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! The Query Dispatcher (§4.6): method-name dispatch over the current
//! workspace snapshot, shaping analyzer results into the wire envelopes.

mod context;
mod dispatcher;
mod error;

pub use context::DaemonContext;
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::DispatchError;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
