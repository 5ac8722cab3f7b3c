// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client launcher (§4.8): locate a running daemon, spawn one if absent, and
//! hand back a connected [`DaemonClient`].
//!
//! Grounded in `crates/daemon/src/main.rs`'s startup-marker contract (the
//! daemon writes `STARTUP_MARKER_PREFIX` plus its PID to its log file before
//! the tracing subscriber starts, then an `ERROR` line if startup fails) and
//! in the PID-file liveness check `rq-daemon::pid_file::is_locked` already
//! built for the supervisor's own stale-socket recovery.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rq_core::{canonicalize_workspace, pid_path, socket_path, DaemonStatus, WorkspaceKey};
use rq_daemon::{env, pid_file, read_pid};
use rq_wire::{PingEnvelope, ResponsePayload};
use thiserror::Error;
use tokio::process::Command;

use crate::client::{ClientError, DaemonClient};

const CONNECT_PROBE_DEADLINE: Duration = Duration::from_millis(500);
const RETRY_INTERVAL: Duration = Duration::from_secs(1);
const RETRY_ATTEMPTS: u32 = 30;

/// Prefix `rqd` writes to its log file on startup — kept identical to the
/// daemon binary's own constant so the launcher can find the right span.
const STARTUP_MARKER_PREFIX: &str = "--- rqd: starting (pid: ";

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to canonicalize workspace path {0}: {1}")]
    Workspace(PathBuf, std::io::Error),

    #[error(transparent)]
    Path(#[from] rq_core::PathError),

    #[error("failed to locate or spawn the daemon binary: {0}")]
    Spawn(std::io::Error),

    #[error("daemon failed to load the workspace: {0}")]
    WorkspaceLoad(String),

    #[error("daemon exited before becoming ready: {0}")]
    DaemonError(String),

    #[error("daemon did not become ready after {0} connection attempts")]
    Timeout(u32),
}

pub struct Launched {
    pub client: DaemonClient,
    pub workspace_root: PathBuf,
    pub socket_path: PathBuf,
    pub pid_path: PathBuf,
}

/// Locate or start the daemon for `workspace` and return a connected client.
pub async fn launch(workspace: &Path, idle_timeout_minutes: Option<u32>) -> Result<Launched, LaunchError> {
    let workspace_root =
        canonicalize_workspace(workspace).map_err(|e| LaunchError::Workspace(workspace.to_path_buf(), e))?;
    let key = WorkspaceKey::from_canonical_path(&workspace_root);
    let socket = socket_path(key)?;
    let pid = pid_path(key)?;

    if pid_file::is_locked(&pid) {
        if let Ok(client) = DaemonClient::connect(&socket, CONNECT_PROBE_DEADLINE).await {
            return Ok(Launched { client, workspace_root, socket_path: socket, pid_path: pid });
        }
    }

    let _ = std::fs::remove_file(&socket);
    let _ = std::fs::remove_file(&pid);

    let log_path = log_path_for(key)?;
    let mut child = spawn_daemon(&workspace_root, idle_timeout_minutes)?;

    for _ in 0..RETRY_ATTEMPTS {
        if let Ok(Some(status)) = child.try_wait() {
            let message = read_startup_error(&log_path)
                .unwrap_or_else(|| format!("daemon process exited with status {status}"));
            return Err(if status.code() == Some(2) {
                LaunchError::WorkspaceLoad(message)
            } else {
                LaunchError::DaemonError(message)
            });
        }
        match DaemonClient::connect(&socket, CONNECT_PROBE_DEADLINE).await {
            Ok(client) => return Ok(Launched { client, workspace_root, socket_path: socket, pid_path: pid }),
            Err(_) => tokio::time::sleep(RETRY_INTERVAL).await,
        }
    }

    Err(LaunchError::Timeout(RETRY_ATTEMPTS))
}

/// Answer `rq status` (§12 supplement): report what's knowable from the
/// PID file alone, and only attempt a connection to fill in `responsive`
/// and the idle figures. Never spawns a daemon.
pub async fn probe_status(workspace: &Path) -> Result<DaemonStatus, LaunchError> {
    let workspace_root =
        canonicalize_workspace(workspace).map_err(|e| LaunchError::Workspace(workspace.to_path_buf(), e))?;
    let key = WorkspaceKey::from_canonical_path(&workspace_root);
    let socket = socket_path(key)?;
    let pid_file_path = pid_path(key)?;

    let running = pid_file::is_locked(&pid_file_path);
    let pid = read_pid(&pid_file_path);

    if !running {
        return Ok(DaemonStatus {
            workspace: workspace_root,
            socket_path: socket,
            pid_file_path,
            running: false,
            responsive: false,
            pid: None,
            idle_timeout_minutes: None,
            idle_seconds: None,
        });
    }

    let (responsive, idle_timeout_minutes, idle_seconds) =
        match DaemonClient::connect(&socket, CONNECT_PROBE_DEADLINE).await {
            Ok(client) => match client.request("ping", serde_json::Value::Null).await {
                Ok(response) => match response.payload {
                    ResponsePayload::Result { result } => {
                        match serde_json::from_value::<PingEnvelope>(result) {
                            Ok(ping) => (true, Some(ping.idle_timeout_minutes), Some(ping.idle_seconds)),
                            Err(_) => (false, None, None),
                        }
                    }
                    ResponsePayload::Error { .. } => (false, None, None),
                },
                Err(_) => (false, None, None),
            },
            Err(_) => (false, None, None),
        };

    Ok(DaemonStatus {
        workspace: workspace_root,
        socket_path: socket,
        pid_file_path,
        running,
        responsive,
        pid,
        idle_timeout_minutes,
        idle_seconds,
    })
}

fn log_path_for(key: WorkspaceKey) -> Result<PathBuf, LaunchError> {
    Ok(env::log_dir()?.join(format!("roslyn-query-{key}.log")))
}

fn spawn_daemon(
    workspace_root: &Path,
    idle_timeout_minutes: Option<u32>,
) -> Result<tokio::process::Child, LaunchError> {
    let binary = daemon_binary_path().map_err(LaunchError::Spawn)?;
    let mut command = Command::new(binary);
    command.arg(workspace_root);
    if let Some(minutes) = idle_timeout_minutes {
        command.arg("--idle-timeout").arg(minutes.to_string());
    }
    command.stdin(std::process::Stdio::null());
    command.stdout(std::process::Stdio::null());
    command.stderr(std::process::Stdio::null());
    command.spawn().map_err(LaunchError::Spawn)
}

/// The `rqd` binary is expected to live alongside `rq` — the same layout
/// `cargo install`/packaging produces for a workspace's sibling binaries.
fn daemon_binary_path() -> std::io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "current executable has no parent directory")
    })?;
    let name = if cfg!(windows) { "rqd.exe" } else { "rqd" };
    Ok(dir.join(name))
}

/// Scan the daemon's log file for the most recent startup span and return
/// its `ERROR` line, if any (§4.8, §7 "child exits before ready").
fn read_startup_error(log_path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(log_path).ok()?;
    let start = content.rfind(STARTUP_MARKER_PREFIX)?;
    content[start..]
        .lines()
        .find(|line| line.starts_with("ERROR"))
        .map(|line| line.trim_start_matches("ERROR").trim().to_string())
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
