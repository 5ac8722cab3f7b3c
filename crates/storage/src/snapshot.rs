// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The workspace snapshot value type (§3).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use rq_core::SnapshotVersion;

use crate::loader::LoadedWorkspace;

/// One loaded project within a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHandle {
    pub name: String,
    pub path: PathBuf,
}

/// One loaded document. `text` is the last-known content driving the
/// analyzer's view of this path — only present for `apply_edit` round-trips
/// and diagnostics; queries route through `analyzer_state` for everything else.
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    pub path: PathBuf,
    pub text: Arc<str>,
}

/// An immutable, versioned view of a loaded workspace (§3).
///
/// Never mutated after construction — `SnapshotManager` only ever replaces
/// the pointer to it, never a field inside it (§4.5, §8 property 2).
pub struct Snapshot<A> {
    version: SnapshotVersion,
    root: PathBuf,
    projects: Vec<ProjectHandle>,
    documents: HashMap<PathBuf, DocumentHandle>,
    analyzer_state: Arc<A>,
}

impl<A> Snapshot<A> {
    pub(crate) fn new(version: SnapshotVersion, loaded: LoadedWorkspace<A>) -> Self {
        Self {
            version,
            root: loaded.root,
            projects: loaded.projects,
            documents: loaded.documents,
            analyzer_state: loaded.analyzer_state,
        }
    }

    pub fn version(&self) -> SnapshotVersion {
        self.version
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    pub fn projects(&self) -> &[ProjectHandle] {
        &self.projects
    }

    pub fn documents(&self) -> &HashMap<PathBuf, DocumentHandle> {
        &self.documents
    }

    pub fn document(&self, path: &std::path::Path) -> Option<&DocumentHandle> {
        self.documents.get(path)
    }

    pub fn analyzer_state(&self) -> &Arc<A> {
        &self.analyzer_state
    }

    /// Render `path` relative to `root` when it lies beneath it, else leave
    /// it as the canonical absolute path (§3 Location, §4.6 shared rule).
    pub fn display_path(&self, path: &std::path::Path) -> String {
        path.strip_prefix(&self.root)
            .map(|rel| rel.to_string_lossy().into_owned())
            .unwrap_or_else(|_| path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
