// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon status (§3): answered by the CLI launcher without necessarily
//! holding a live connection (§12 supplemented `rq status`).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonStatus {
    pub workspace: PathBuf,
    pub socket_path: PathBuf,
    pub pid_file_path: PathBuf,
    pub running: bool,
    pub responsive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_timeout_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_seconds: Option<u64>,
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
