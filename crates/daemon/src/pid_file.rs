// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PID-file rendezvous (§4.1, §6): the file a second daemon or a client uses
//! to tell "already running" from "stale, safe to clean up".
//!
//! Grounded in the corpus's `crates/daemon/src/lifecycle/startup.rs`: the
//! lock is acquired on the PID file itself via `fs2::FileExt`, before any
//! other startup step, and the PID is written into that same locked file —
//! not via a separate write-then-rename, since renaming over a locked inode
//! would leave later openers looking at an unlocked replacement and defeat
//! the lock entirely. The file doubling as both the advisory lock and the
//! liveness record is the corpus's own design, kept here unchanged.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PidFileError {
    #[error("a daemon is already running for this workspace ({0})")]
    AlreadyRunning(PathBuf),

    #[error("failed to open pid file {0}: {1}")]
    Open(PathBuf, std::io::Error),

    #[error("failed to write pid file {0}: {1}")]
    Write(PathBuf, std::io::Error),
}

/// Holds the exclusive advisory lock on a workspace's PID file for the
/// supervisor's lifetime. Acquired first, before the analyzer, the snapshot
/// manager, the watcher, or the socket (§4.7).
pub struct PidFile {
    path: PathBuf,
    file: File,
}

impl PidFile {
    /// Acquire the lock and write this process's PID. Fails immediately
    /// (never blocks) if another process already holds it.
    pub fn acquire(path: PathBuf) -> Result<Self, PidFileError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|e| PidFileError::Open(path.clone(), e))?;

        file.try_lock_exclusive().map_err(|_| PidFileError::AlreadyRunning(path.clone()))?;

        let mut pid_file = Self { path, file };
        pid_file.write_pid()?;
        Ok(pid_file)
    }

    fn write_pid(&mut self) -> Result<(), PidFileError> {
        let err = |e| PidFileError::Write(self.path.clone(), e);
        self.file.set_len(0).map_err(err)?;
        self.file.seek(SeekFrom::Start(0)).map_err(err)?;
        write!(self.file, "{}", std::process::id()).map_err(err)?;
        self.file.sync_all().map_err(err)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file from disk on clean shutdown (§4.7). The lock itself
    /// is released by the OS when `file` drops regardless of this call.
    pub fn remove(self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Read the PID recorded in the file at `path`, for status/debugging only —
/// liveness itself is decided by [`is_locked`], not by this value (§3
/// `DaemonStatus.pid`).
pub fn read_pid(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Whether some process currently holds the exclusive lock on the PID file
/// at `path` — the client launcher's "names a live process" check (§4.8).
/// A missing file, or one nobody holds the lock on, is reported as not
/// locked (stale or never created).
pub fn is_locked(path: &Path) -> bool {
    let file = match OpenOptions::new().read(true).write(true).create(true).open(path) {
        Ok(file) => file,
        Err(_) => return false,
    };
    match file.try_lock_exclusive() {
        Ok(()) => {
            let _ = FileExt::unlock(&file);
            false
        }
        Err(_) => true,
    }
}

#[cfg(test)]
#[path = "pid_file_tests.rs"]
mod tests;
