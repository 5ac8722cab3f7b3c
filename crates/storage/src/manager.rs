// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `SnapshotManager` (§4.5): single-writer, many-readers publication of
//! immutable snapshots.
//!
//! Readers take a `parking_lot::RwLock` read guard, clone the `Arc`, and
//! drop the guard — never held across an analyzer call. Writers build the
//! next snapshot with no lock held at all (the loader call suspends freely),
//! then take the write guard only for the pointer swap itself, which never
//! suspends. That ordering is what keeps the rule in §5 true: "the
//! snapshot-manager write lock is released synchronously around, not
//! across, suspension points of the analyzer load."

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use rq_core::SnapshotVersion;

use crate::error::SnapshotError;
use crate::loader::WorkspaceLoader;
use crate::snapshot::Snapshot;

pub struct SnapshotManager<A>
where
    A: Send + Sync + 'static,
{
    root: PathBuf,
    loader: Arc<dyn WorkspaceLoader<A>>,
    current: RwLock<Arc<Snapshot<A>>>,
}

impl<A> SnapshotManager<A>
where
    A: Send + Sync + 'static,
{
    /// Parse `root` with the analyzer and publish snapshot version 1 (§4.5).
    pub async fn load_initial(
        root: PathBuf,
        loader: Arc<dyn WorkspaceLoader<A>>,
    ) -> Result<Self, SnapshotError> {
        let loaded = loader.load_initial(&root).await.map_err(SnapshotError::LoadFailure)?;
        let snapshot = Arc::new(Snapshot::new(SnapshotVersion::FIRST, loaded));
        info!(version = %snapshot.version(), "initial snapshot published");
        Ok(Self { root, loader, current: RwLock::new(snapshot) })
    }

    /// Obtain a reference-counted handle to the current snapshot in O(1).
    /// Never blocks on a writer building the next one (§4.5, §8 property 3).
    pub fn current(&self) -> Arc<Snapshot<A>> {
        Arc::clone(&self.current.read())
    }

    /// Build a new workspace from disk, assign `version+1`, and publish it
    /// by atomic pointer swap. The retired snapshot's resources are released
    /// only once its last reader drops its handle (§4.5, §9).
    pub async fn reload(&self) -> Result<(), SnapshotError> {
        let loaded = self.loader.reload(&self.root).await.map_err(SnapshotError::ReloadFailure)?;
        let next_version = self.current.read().version().next();
        let snapshot = Arc::new(Snapshot::new(next_version, loaded));
        *self.current.write() = snapshot;
        info!(version = %next_version, "reload published");
        Ok(())
    }

    /// Replace one document's text in the current snapshot, publishing
    /// `version+1`. A no-op if `path` is not part of the current document
    /// set — new-file creation is not handled here (§4.5, §9).
    pub async fn apply_edit(&self, path: &Path, new_text: &str) -> Result<bool, SnapshotError> {
        let current = self.current();
        if current.document(path).is_none() {
            return Ok(false);
        }
        let loaded = self
            .loader
            .apply_edit(&current, path, new_text)
            .await
            .map_err(SnapshotError::ReloadFailure)?;
        let next_version = current.version().next();
        let snapshot = Arc::new(Snapshot::new(next_version, loaded));
        *self.current.write() = snapshot;
        info!(version = %next_version, path = %path.display(), "incremental edit published");
        Ok(true)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
