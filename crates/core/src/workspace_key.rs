// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace identity: canonicalization and the stable workspace key (§3, §4.1).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Canonicalize a workspace path for identity purposes: resolve `..` and
/// symlinks via the filesystem, then fold case on platforms where the
/// filesystem is case-insensitive.
///
/// Two aliases to the same workspace (e.g. a symlinked checkout) can still
/// canonicalize to different strings if the filesystem itself doesn't
/// dereference them consistently — this is the open question noted in
/// spec §9 ("workspace-key canonicalization is platform-dependent"), carried
/// forward rather than guessed at.
pub fn canonicalize_workspace(path: &Path) -> std::io::Result<PathBuf> {
    let canonical = std::fs::canonicalize(path)?;
    Ok(fold_case_if_insensitive(canonical))
}

#[cfg(target_os = "windows")]
fn fold_case_if_insensitive(path: PathBuf) -> PathBuf {
    PathBuf::from(path.to_string_lossy().to_lowercase())
}

#[cfg(not(target_os = "windows"))]
fn fold_case_if_insensitive(path: PathBuf) -> PathBuf {
    path
}

/// Hex-encoded 8-byte truncated SHA-256 of a canonicalized workspace path.
///
/// Stable across process restarts; used to derive the socket and PID file
/// names for a given workspace (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceKey([u8; 8]);

impl WorkspaceKey {
    /// Derive the key from an already-canonicalized workspace path.
    pub fn from_canonical_path(canonical: &Path) -> Self {
        let bytes = canonical.to_string_lossy();
        let digest = Sha256::digest(bytes.as_bytes());
        let mut truncated = [0u8; 8];
        truncated.copy_from_slice(&digest[..8]);
        Self(truncated)
    }

    pub fn as_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for WorkspaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

#[cfg(test)]
#[path = "workspace_key_tests.rs"]
mod tests;
