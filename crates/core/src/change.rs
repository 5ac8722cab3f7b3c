// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change events emitted by the debounced watcher (§3, §4.4).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
    Renamed,
}

/// `{kind, path, old_path?}` plus the derived `full_reload` classifier (§3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<PathBuf>,
    pub full_reload: bool,
}

impl ChangeEvent {
    /// Project/solution manifest extensions trigger an immediate full reload (§4.4).
    pub fn is_manifest_path(path: &std::path::Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("csproj") | Some("sln")
        )
    }

    pub fn new(kind: ChangeKind, path: PathBuf, old_path: Option<PathBuf>) -> Self {
        let full_reload = Self::is_manifest_path(&path)
            || old_path.as_deref().is_some_and(Self::is_manifest_path);
        Self { kind, path, old_path, full_reload }
    }
}

#[cfg(test)]
#[path = "change_tests.rs"]
mod tests;
