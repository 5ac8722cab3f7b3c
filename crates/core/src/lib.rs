// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rq-core: shared data model for the roslyn-query daemon.
//!
//! Everything here is plain, cloneable data with no dependency on the
//! IPC layer, the snapshot manager, or the analyzer adapter. Those crates
//! depend on this one, not the other way around.

pub mod change;
pub mod clock;
pub mod diagnostic;
pub mod paths;
pub mod position;
pub mod status;
pub mod symbol;
pub mod version;
pub mod workspace_key;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use change::{ChangeEvent, ChangeKind};
pub use clock::{Clock, FakeClock, SystemClock};
pub use diagnostic::{Diagnostic, Severity};
pub use paths::{pid_path, runtime_dir, socket_path, PathError};
pub use position::{Location, Position};
pub use status::DaemonStatus;
pub use symbol::{Accessibility, SymbolDescriptor, SymbolKind};
pub use version::SnapshotVersion;
pub use workspace_key::{canonicalize_workspace, WorkspaceKey};
