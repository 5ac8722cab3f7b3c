// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rqd`: the spawned-process entry point (§6). Parses `rqd <workspace-path>
//! [--idle-timeout <minutes>]`, runs the §4.7 startup sequence, then serves
//! until shutdown.
//!
//! Grounded in the corpus's `crates/daemon/src/main.rs`: startup marker and
//! error written to the log file synchronously (before/around the tracing
//! subscriber, so the spawning client can find them even if the process
//! dies before tracing flushes), structured logging via `tracing-appender`.

use std::path::PathBuf;
use std::sync::Arc;

use rq_adapters::TextIndexAdapter;
use rq_core::{canonicalize_workspace, pid_path, socket_path, WorkspaceKey};
use rq_daemon::{env, Supervisor, SupervisorError};
use tracing::{error, info};

/// Prefix the client launcher scans the log file for to find where this
/// startup attempt begins (§4.8, §7 "child exits before ready").
const STARTUP_MARKER_PREFIX: &str = "--- rqd: starting (pid: ";

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (workspace, idle_timeout_minutes) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("usage: rqd <workspace-path> [--idle-timeout <minutes>]");
            std::process::exit(1);
        }
    };

    let workspace_root = match canonicalize_workspace(&workspace) {
        Ok(root) => root,
        Err(e) => {
            eprintln!("error: failed to canonicalize workspace path {}: {e}", workspace.display());
            std::process::exit(2);
        }
    };

    let key = WorkspaceKey::from_canonical_path(&workspace_root);
    let socket_path = match socket_path(key) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    let pid_path = match pid_path(key) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let log_path = match env::log_dir() {
        Ok(dir) => dir.join(format!("roslyn-query-{key}.log")),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    write_startup_marker(&log_path);
    let _log_guard = setup_logging(&log_path);

    info!(workspace = %workspace_root.display(), "starting");

    let analyzer = Arc::new(TextIndexAdapter::new());
    let supervisor = Supervisor::<TextIndexAdapter>::start(
        workspace_root,
        socket_path,
        pid_path,
        analyzer,
        idle_timeout_minutes,
    )
    .await;

    let supervisor = match supervisor {
        Ok(supervisor) => supervisor,
        Err(SupervisorError::PidFile(rq_daemon::PidFileError::AlreadyRunning(path))) => {
            info!(pid_file = %path.display(), "a daemon is already running for this workspace");
            println!("already running");
            std::process::exit(0);
        }
        Err(e) => {
            write_startup_error(&log_path, &e);
            error!(error = %e, "failed to start");
            match e {
                SupervisorError::Load(_) => std::process::exit(2),
                _ => std::process::exit(1),
            }
        }
    };

    println!("READY");
    supervisor.run().await;
    info!("stopped");
}

fn parse_args(args: &[String]) -> Result<(PathBuf, u32), String> {
    let mut workspace = None;
    let mut idle_timeout_minutes = env::idle_timeout_minutes_default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--idle-timeout" => {
                let value = iter.next().ok_or("--idle-timeout requires a value")?;
                idle_timeout_minutes = value.parse().map_err(|_| "--idle-timeout must be a non-negative integer".to_string())?;
            }
            other if workspace.is_none() => workspace = Some(PathBuf::from(other)),
            other => return Err(format!("unexpected argument '{other}'")),
        }
    }

    let workspace = workspace.ok_or("missing required <workspace-path> argument")?;
    Ok((workspace, idle_timeout_minutes))
}

fn write_startup_marker(log_path: &std::path::Path) {
    use std::io::Write;
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(mut file) = std::fs::OpenOptions::new().create(true).append(true).open(log_path) {
        let _ = writeln!(file, "{STARTUP_MARKER_PREFIX}{}) ---", std::process::id());
    }
}

fn write_startup_error(log_path: &std::path::Path, error: &SupervisorError) {
    use std::io::Write;
    if let Ok(mut file) = std::fs::OpenOptions::new().create(true).append(true).open(log_path) {
        let _ = writeln!(file, "ERROR failed to start rqd: {error}");
    }
}

fn setup_logging(log_path: &std::path::Path) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let parent = log_path.parent()?;
    std::fs::create_dir_all(parent).ok()?;
    let file_name = log_path.file_name()?;
    let file_appender = tracing_appender::rolling::never(parent, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(non_blocking)).init();

    Some(guard)
}
