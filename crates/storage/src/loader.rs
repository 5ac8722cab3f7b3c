// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The workspace-loader seam: turning `.sln`/`.csproj` files (and the
//! semantic analyzer behind them) into loaded workspace state (§1 explicitly
//! out of scope; modeled here only as the interface this system consumes).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LoadError;
use crate::snapshot::{DocumentHandle, ProjectHandle, Snapshot};

/// The unversioned result of a load, reload, or incremental edit — the
/// manager stamps a `SnapshotVersion` onto this before publishing it.
pub struct LoadedWorkspace<A> {
    pub root: PathBuf,
    pub projects: Vec<ProjectHandle>,
    pub documents: HashMap<PathBuf, DocumentHandle>,
    pub analyzer_state: Arc<A>,
}

/// Builds and incrementally updates the analyzer-backed state behind a
/// snapshot. `A` is the opaque analyzer-state type (§3 `analyzer_state`) —
/// this crate never inspects it, only carries it.
#[async_trait]
pub trait WorkspaceLoader<A>: Send + Sync
where
    A: Send + Sync + 'static,
{
    /// Parse `root` from disk and produce the first loaded workspace.
    async fn load_initial(&self, root: &Path) -> Result<LoadedWorkspace<A>, LoadError>;

    /// Re-parse `root` from disk in full (§4.4 full-reload trigger).
    async fn reload(&self, root: &Path) -> Result<LoadedWorkspace<A>, LoadError>;

    /// Replace one document's text in `current` using the analyzer's
    /// incremental-update facility. The caller has already confirmed `path`
    /// is present in `current`'s document set (§4.5 `apply_edit` no-op rule).
    async fn apply_edit(
        &self,
        current: &Snapshot<A>,
        path: &Path,
        new_text: &str,
    ) -> Result<LoadedWorkspace<A>, LoadError>;
}
