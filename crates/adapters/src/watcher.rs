// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The debounced filesystem watcher (§4.4): batches raw OS events into
//! either a coalesced change set or an immediate full-reload signal.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event as NotifyEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rq_core::{ChangeEvent, ChangeKind};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to start filesystem watcher on {path}: {source}")]
    Start { path: PathBuf, #[source] source: notify::Error },
}

/// What the watcher emits downstream (§4.4).
#[derive(Debug, Clone)]
pub enum WatchBatch {
    /// A debounce window elapsed with one or more coalesced, non-manifest
    /// events pending.
    Changed(Vec<ChangeEvent>),
    /// A project/solution manifest changed, or the OS watcher reported an
    /// overflow ("state unknown") — either way, reload now (§4.4, §9).
    FullReload,
}

/// Watches `root` recursively and emits coalesced [`WatchBatch`]es.
///
/// Raw OS events arrive on a background thread (notify's callback model) and
/// are forwarded into this struct's async coalescing loop over a channel —
/// the same shape as a one-shot file-tail watch, generalized to a whole
/// directory tree and a debounce window instead of a single `Modify` signal.
pub struct DebouncedWatcher {
    _watcher: RecommendedWatcher,
    batches: mpsc::UnboundedReceiver<WatchBatch>,
}

impl DebouncedWatcher {
    pub fn start(root: &Path) -> Result<Self, WatchError> {
        Self::start_with_debounce(root, DEFAULT_DEBOUNCE)
    }

    pub fn start_with_debounce(root: &Path, debounce: Duration) -> Result<Self, WatchError> {
        let (raw_tx, raw_rx) = mpsc::unbounded_channel::<RawSignal>();

        let mut watcher = notify::recommended_watcher(move |res: Result<NotifyEvent, notify::Error>| {
            let signal = match res {
                Ok(event) => RawSignal::from_notify_event(event),
                Err(_) => Some(RawSignal::Overflow),
            };
            if let Some(signal) = signal {
                let _ = raw_tx.send(signal);
            }
        })
        .map_err(|source| WatchError::Start { path: root.to_path_buf(), source })?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|source| WatchError::Start { path: root.to_path_buf(), source })?;

        let (batch_tx, batch_rx) = mpsc::unbounded_channel();
        tokio::spawn(coalesce_loop(raw_rx, batch_tx, debounce));

        Ok(Self { _watcher: watcher, batches: batch_rx })
    }

    /// Receive the next batch. Returns `None` once the background task has
    /// ended (the watcher itself was dropped).
    pub async fn recv(&mut self) -> Option<WatchBatch> {
        self.batches.recv().await
    }
}

enum RawSignal {
    Event(ChangeEvent),
    Overflow,
}

impl RawSignal {
    fn from_notify_event(event: NotifyEvent) -> Option<Self> {
        let kind = match event.kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Modify(notify::event::ModifyKind::Name(_)) => ChangeKind::Renamed,
            EventKind::Modify(_) => ChangeKind::Modified,
            EventKind::Remove(_) => ChangeKind::Deleted,
            _ => return None,
        };

        let mut paths = event.paths.into_iter();
        let path = paths.next()?;
        let old_path = if kind == ChangeKind::Renamed { paths.next() } else { None };
        Some(RawSignal::Event(ChangeEvent::new(kind, path, old_path)))
    }
}

async fn coalesce_loop(
    mut raw: mpsc::UnboundedReceiver<RawSignal>,
    out: mpsc::UnboundedSender<WatchBatch>,
    debounce: Duration,
) {
    let mut pending: HashMap<PathBuf, ChangeEvent> = HashMap::new();
    let mut deadline: Option<tokio::time::Instant> = None;

    loop {
        let sleep = match deadline {
            Some(at) => tokio::time::sleep_until(at),
            None => tokio::time::sleep(Duration::from_secs(3600)),
        };

        tokio::select! {
            signal = raw.recv() => {
                match signal {
                    Some(RawSignal::Overflow) => {
                        warn!("filesystem watcher overflowed, state unknown");
                        pending.clear();
                        deadline = None;
                        if out.send(WatchBatch::FullReload).is_err() {
                            return;
                        }
                    }
                    Some(RawSignal::Event(event)) if event.full_reload => {
                        pending.clear();
                        deadline = None;
                        if out.send(WatchBatch::FullReload).is_err() {
                            return;
                        }
                    }
                    Some(RawSignal::Event(event)) => {
                        coalesce(&mut pending, event);
                        deadline = Some(tokio::time::Instant::now() + debounce);
                    }
                    None => return,
                }
            }
            _ = sleep, if deadline.is_some() => {
                let batch: Vec<ChangeEvent> = pending.drain().map(|(_, v)| v).collect();
                deadline = None;
                if !batch.is_empty() {
                    info!(count = batch.len(), "debounce window elapsed, emitting batch");
                    if out.send(WatchBatch::Changed(batch)).is_err() {
                        return;
                    }
                }
            }
        }
    }
}

/// Last-writer-wins on kind, with "created then deleted" collapsing to
/// deleted and "renamed" preserving both paths (§4.4).
fn coalesce(pending: &mut HashMap<PathBuf, ChangeEvent>, incoming: ChangeEvent) {
    let key = incoming.path.clone();
    let merged = match pending.remove(&key) {
        Some(existing) if existing.kind == ChangeKind::Created && incoming.kind == ChangeKind::Deleted => {
            ChangeEvent::new(ChangeKind::Deleted, incoming.path, incoming.old_path)
        }
        _ => incoming,
    };
    pending.insert(key, merged);
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
