// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixture `WorkspaceLoader` for this crate's own tests and for
//! `rq-engine`/`rq-adapters` tests that need a `SnapshotManager` without a
//! real analyzer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::LoadError;
use crate::loader::{LoadedWorkspace, WorkspaceLoader};
use crate::snapshot::{DocumentHandle, ProjectHandle, Snapshot};

/// Builds `LoadedWorkspace<A>` from an in-memory `path -> text` map and a
/// caller-supplied analyzer-state builder, so each reload can be made to
/// observe a different map (mutate it between calls via `set_documents`).
pub struct FixtureLoader<A, F>
where
    A: Send + Sync + 'static,
    F: Fn(&HashMap<PathBuf, String>) -> A + Send + Sync,
{
    root: PathBuf,
    documents: Mutex<HashMap<PathBuf, String>>,
    build_state: F,
}

impl<A, F> FixtureLoader<A, F>
where
    A: Send + Sync + 'static,
    F: Fn(&HashMap<PathBuf, String>) -> A + Send + Sync,
{
    pub fn new(root: PathBuf, documents: HashMap<PathBuf, String>, build_state: F) -> Self {
        Self { root, documents: Mutex::new(documents), build_state }
    }

    /// Replace the fixture's document map, as if a reload observed new
    /// content on disk.
    pub fn set_documents(&self, documents: HashMap<PathBuf, String>) {
        *self.documents.lock() = documents;
    }

    fn snapshot_of(&self, documents: &HashMap<PathBuf, String>) -> LoadedWorkspace<A> {
        let handles = documents
            .iter()
            .map(|(path, text)| {
                (path.clone(), DocumentHandle { path: path.clone(), text: Arc::from(text.as_str()) })
            })
            .collect();
        LoadedWorkspace {
            root: self.root.clone(),
            projects: vec![ProjectHandle { name: "Fixture".to_string(), path: self.root.clone() }],
            documents: handles,
            analyzer_state: Arc::new((self.build_state)(documents)),
        }
    }
}

#[async_trait]
impl<A, F> WorkspaceLoader<A> for FixtureLoader<A, F>
where
    A: Send + Sync + 'static,
    F: Fn(&HashMap<PathBuf, String>) -> A + Send + Sync,
{
    async fn load_initial(&self, _root: &Path) -> Result<LoadedWorkspace<A>, LoadError> {
        Ok(self.snapshot_of(&self.documents.lock()))
    }

    async fn reload(&self, _root: &Path) -> Result<LoadedWorkspace<A>, LoadError> {
        Ok(self.snapshot_of(&self.documents.lock()))
    }

    async fn apply_edit(
        &self,
        _current: &Snapshot<A>,
        path: &Path,
        new_text: &str,
    ) -> Result<LoadedWorkspace<A>, LoadError> {
        let mut documents = self.documents.lock();
        documents.insert(path.to_path_buf(), new_text.to_string());
        Ok(self.snapshot_of(&documents))
    }
}
