// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment-variable overrides for the supervisor's tunables
//! (§4.7, §4.4, §6 — spec.md leaves every one of these a named constant, not
//! a config surface; this module is the ambient-stack addition that makes
//! them runtime-overridable).

use std::time::Duration;

/// Idle-shutdown timeout in minutes, absent an explicit `--idle-timeout`
/// flag. 0 disables the watchdog (§4.7).
pub fn idle_timeout_minutes_default() -> u32 {
    std::env::var("RQ_IDLE_TIMEOUT_MINUTES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30)
}

/// Debounce window for the filesystem watcher (§4.4, default 300ms).
pub fn debounce() -> Duration {
    std::env::var("RQ_DEBOUNCE_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(300))
}

/// Bound on how long shutdown waits for in-flight handlers to drain (§4.7,
/// default 5s).
pub fn drain_timeout() -> Duration {
    std::env::var("RQ_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Directory the daemon writes its log file into, absent an explicit
/// `RQ_LOG_DIR` override (§12, default: alongside the socket/PID directory).
pub fn log_dir() -> Result<std::path::PathBuf, rq_core::PathError> {
    match std::env::var_os("RQ_LOG_DIR") {
        Some(dir) => Ok(std::path::PathBuf::from(dir)),
        None => rq_core::runtime_dir(),
    }
}

/// Idle-watchdog check interval: `min(60s, timeout)` per §4.7, expressed as
/// an override knob for tests that don't want to wait a full minute.
pub fn idle_check_interval(timeout_minutes: u32) -> Duration {
    if let Ok(ms) = std::env::var("RQ_IDLE_CHECK_MS") {
        if let Ok(ms) = ms.parse::<u64>() {
            return Duration::from_millis(ms);
        }
    }
    let timeout = Duration::from_secs(u64::from(timeout_minutes) * 60);
    Duration::from_secs(60).min(timeout)
}
