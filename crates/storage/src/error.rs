// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use thiserror::Error;

/// Failure from the project-format loader or the analyzer while building a
/// workspace (§4.5 `load_initial`/`reload`). Both collaborators are external
/// seams (§1); this is the one shape their failures are reported in.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed manifest at {0}: {1}")]
    MalformedManifest(PathBuf, String),

    #[error("io error reading {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
}

/// Errors from the snapshot manager itself.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("initial load failed")]
    LoadFailure(#[source] LoadError),

    #[error("reload failed")]
    ReloadFailure(#[source] LoadError),
}
