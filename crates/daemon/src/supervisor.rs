// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon supervisor (§4.7): owns the strictly-ordered startup and
//! shutdown sequence, the idle watchdog, and the [`DaemonContext`] seam
//! the dispatcher reads through.
//!
//! Grounded in the corpus's `crates/daemon/src/lifecycle/mod.rs::DaemonState`
//! and `startup.rs`, generalized down to this system's much smaller shared
//! state: no WAL, no event bus, just the snapshot manager, the watcher, and
//! the listener.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rq_adapters::{AnalyzerAdapter, DebouncedWatcher, WatchError};
use rq_core::{Clock, SystemClock};
use rq_engine::{DaemonContext, Dispatcher};
use rq_storage::{SnapshotError, SnapshotManager, WorkspaceLoader};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::env;
use crate::listener::{ListenError, Listener};
use crate::pid_file::{PidFile, PidFileError};
use crate::watcher_task;

/// The watcher task's view of activity tracking — separate from
/// [`DaemonContext`] because the dispatcher has no business touching it and
/// the watcher task has no business reading idle configuration.
pub(crate) trait ActivityTracker: Send + Sync {
    fn touch(&self);
}

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error(transparent)]
    PidFile(#[from] PidFileError),

    #[error("failed to load workspace: {0}")]
    Load(#[from] SnapshotError),

    #[error("failed to start filesystem watcher: {0}")]
    Watch(#[from] WatchError),

    #[error("failed to bind IPC socket: {0}")]
    Listen(#[from] ListenError),
}

/// Shared activity/shutdown state behind the [`DaemonContext`] seam. Kept
/// separate from `Supervisor` itself so it can be hooked up to the
/// dispatcher (which only ever sees `Arc<dyn DaemonContext>`) before the
/// listener and watchdog tasks exist.
struct SupervisorState<C: Clock> {
    clock: C,
    idle_timeout_minutes: u32,
    last_activity: AtomicU64,
    shutdown: CancellationToken,
}

impl<C: Clock> SupervisorState<C> {
    fn new(clock: C, idle_timeout_minutes: u32) -> Self {
        let now = clock.epoch_ms();
        Self { clock, idle_timeout_minutes, last_activity: AtomicU64::new(now), shutdown: CancellationToken::new() }
    }

    fn touch(&self) {
        self.last_activity.store(self.clock.epoch_ms(), Ordering::SeqCst);
    }
}

impl<C: Clock> ActivityTracker for SupervisorState<C> {
    fn touch(&self) {
        SupervisorState::touch(self);
    }
}

impl<C: Clock> DaemonContext for SupervisorState<C> {
    fn idle_timeout_minutes(&self) -> u32 {
        self.idle_timeout_minutes
    }

    fn idle_seconds(&self) -> u64 {
        let now = self.clock.epoch_ms();
        let last = self.last_activity.load(Ordering::SeqCst);
        now.saturating_sub(last) / 1000
    }

    fn request_shutdown(&self) {
        self.shutdown.cancel();
    }

    fn touch_activity(&self) {
        SupervisorState::touch(self);
    }
}

/// Owns the workspace's socket and PID file for the process lifetime. Built
/// by [`Supervisor::start`], which performs the §4.7 startup sequence;
/// consumed by [`Supervisor::run`], which serves until shutdown.
pub struct Supervisor<A: AnalyzerAdapter> {
    manager: Arc<SnapshotManager<A::State>>,
    watcher_task: JoinHandle<()>,
    listener: Listener<A>,
    pid_file: PidFile,
    socket_path: PathBuf,
    state: Arc<SupervisorState<SystemClock>>,
}

impl<A> Supervisor<A>
where
    A: AnalyzerAdapter + WorkspaceLoader<A::State> + 'static,
{
    /// Run the §4.7 startup sequence: analyzer/loader construction happens
    /// in the caller's own stack frame (this function never constructs an
    /// analyzer, only consumes one already built) → snapshot manager →
    /// initial load → watcher → IPC socket → PID file last.
    pub async fn start(
        workspace_root: PathBuf,
        socket_path: PathBuf,
        pid_path: PathBuf,
        analyzer: Arc<A>,
        idle_timeout_minutes: u32,
    ) -> Result<Self, SupervisorError> {
        let loader: Arc<dyn WorkspaceLoader<A::State>> = analyzer.clone();
        let manager = Arc::new(SnapshotManager::load_initial(workspace_root.clone(), loader).await?);
        info!(root = %workspace_root.display(), "workspace loaded");

        let watcher = DebouncedWatcher::start_with_debounce(&workspace_root, env::debounce())?;

        let state = Arc::new(SupervisorState::new(SystemClock, idle_timeout_minutes));
        let activity: Arc<dyn ActivityTracker> = state.clone();
        let watcher_task = watcher_task::spawn(manager.clone(), watcher, activity);

        let context: Arc<dyn DaemonContext> = state.clone();
        let dispatcher = Arc::new(Dispatcher::new(manager.clone(), analyzer, context.clone()));
        let listener = bind_with_stale_cleanup(&socket_path, &pid_path, dispatcher, context)?;
        info!(socket = %socket_path.display(), "IPC socket bound");

        let pid_file = PidFile::acquire(pid_path)?;
        info!(pid = std::process::id(), "PID file written");

        Ok(Self { manager, watcher_task, listener, pid_file, socket_path, state })
    }

    /// Serve until shutdown is requested by the `shutdown` RPC, a signal, or
    /// the idle watchdog, then run the §4.7 shutdown sequence.
    pub async fn run(self) {
        let Self { manager: _manager, watcher_task, listener, pid_file, socket_path, state } = self;

        let shutdown = state.shutdown.clone();
        let watchdog = tokio::spawn(idle_watchdog(state.clone()));

        tokio::select! {
            _ = shutdown.cancelled() => {}
            _ = signal_shutdown() => {
                info!("termination signal received");
                state.request_shutdown();
            }
        }

        watchdog.abort();

        info!("shutdown sequence starting");
        listener.shutdown(env::drain_timeout()).await;

        watcher_task.abort();

        let _ = std::fs::remove_file(&socket_path);
        pid_file.remove();
        info!("shutdown complete");
    }

    pub fn manager(&self) -> &Arc<SnapshotManager<A::State>> {
        &self.manager
    }
}

/// Bind the IPC socket, resolving a bind conflict the way §6/§7 specify: a
/// conflict means either a live daemon already owns this workspace (confirm
/// via the PID file, surface as [`PidFileError::AlreadyRunning`]) or a stale
/// socket file left behind by a killed process (delete both stale files and
/// retry once).
fn bind_with_stale_cleanup<A>(
    socket_path: &std::path::Path,
    pid_path: &std::path::Path,
    dispatcher: Arc<Dispatcher<A>>,
    context: Arc<dyn DaemonContext>,
) -> Result<Listener<A>, SupervisorError>
where
    A: AnalyzerAdapter + 'static,
{
    match Listener::bind(socket_path.to_path_buf(), dispatcher.clone(), context.clone()) {
        Ok(listener) => Ok(listener),
        Err(ListenError::Bind(path, io_err)) if io_err.kind() == std::io::ErrorKind::AddrInUse => {
            if crate::pid_file::is_locked(pid_path) {
                return Err(SupervisorError::PidFile(PidFileError::AlreadyRunning(pid_path.to_path_buf())));
            }
            info!(socket = %path.display(), "removing stale socket file");
            let _ = std::fs::remove_file(&path);
            let _ = std::fs::remove_file(pid_path);
            Ok(Listener::bind(path, dispatcher, context)?)
        }
        Err(e) => Err(e.into()),
    }
}

async fn idle_watchdog<C: Clock>(state: Arc<SupervisorState<C>>) {
    if state.idle_timeout_minutes == 0 {
        return;
    }
    let interval = env::idle_check_interval(state.idle_timeout_minutes);
    let timeout_secs = u64::from(state.idle_timeout_minutes) * 60;
    loop {
        tokio::time::sleep(interval).await;
        if state.idle_seconds() >= timeout_secs {
            info!(idle_seconds = state.idle_seconds(), "idle timeout reached");
            state.request_shutdown();
            return;
        }
    }
}

#[cfg(unix)]
async fn signal_shutdown() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = sigint.recv() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn signal_shutdown() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
