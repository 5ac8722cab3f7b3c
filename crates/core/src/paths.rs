// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path Keyer (§4.1): derives the socket and PID file paths for a workspace
//! from its stable key, under a well-known per-user runtime directory.

use std::path::PathBuf;

use thiserror::Error;

use crate::workspace_key::WorkspaceKey;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("could not determine a runtime or temp directory for this user")]
    NoRuntimeDir,

    #[error("failed to create runtime directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("failed to set permissions on {0}: {1}")]
    SetPermissions(PathBuf, std::io::Error),
}

const SUBDIR: &str = "roslyn-query";

/// The per-user runtime directory that houses sockets and PID files for
/// every workspace this user has a daemon running against.
///
/// Prefers the platform runtime directory (`XDG_RUNTIME_DIR` on Linux, its
/// equivalent elsewhere) via `dirs::runtime_dir()`, else falls back to the
/// system temp directory, matching the corpus's `OJ_STATE_DIR` >
/// `XDG_STATE_HOME` > `$HOME/.local/state` fallback chain in shape (platform
/// directory first, temp directory last).
///
/// Creates the directory with 0700 permissions on platforms that support
/// Unix permission bits; a no-op restriction elsewhere.
pub fn runtime_dir() -> Result<PathBuf, PathError> {
    let base = dirs::runtime_dir().unwrap_or_else(std::env::temp_dir);
    let dir = base.join(SUBDIR);
    std::fs::create_dir_all(&dir).map_err(|e| PathError::CreateDir(dir.clone(), e))?;
    restrict_to_owner(&dir)?;
    Ok(dir)
}

#[cfg(unix)]
fn restrict_to_owner(dir: &std::path::Path) -> Result<(), PathError> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(0o700);
    std::fs::set_permissions(dir, perms).map_err(|e| PathError::SetPermissions(dir.to_path_buf(), e))
}

#[cfg(not(unix))]
fn restrict_to_owner(_dir: &std::path::Path) -> Result<(), PathError> {
    Ok(())
}

/// Path to the Unix socket for a given workspace key.
pub fn socket_path(key: WorkspaceKey) -> Result<PathBuf, PathError> {
    Ok(runtime_dir()?.join(format!("roslyn-query-{key}.sock")))
}

/// Path to the PID file for a given workspace key.
pub fn pid_path(key: WorkspaceKey) -> Result<PathBuf, PathError> {
    Ok(runtime_dir()?.join(format!("roslyn-query-{key}.pid")))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
