// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires [`DebouncedWatcher`] batches into the snapshot manager (§4.4, §4.5,
//! §9): modified documents are applied as edits in place, anything else
//! (created, deleted, renamed, or a manifest change) falls back to a full
//! reload.
//!
//! New-file and deleted-file handling is deliberately not modeled as its own
//! incremental path — both are folded into the full-reload case, the same
//! simplification the corpus takes for any change it can't describe as an
//! in-place edit of a document already in the snapshot.

use std::sync::Arc;

use rq_adapters::{DebouncedWatcher, WatchBatch};
use rq_core::ChangeKind;
use rq_storage::SnapshotManager;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::supervisor::ActivityTracker;

/// Spawn the task that drains `watcher` for the supervisor's lifetime.
/// Aborting the returned handle drops `watcher` with it, stopping the
/// underlying OS watch.
pub fn spawn<S>(
    manager: Arc<SnapshotManager<S>>,
    mut watcher: DebouncedWatcher,
    activity: Arc<dyn ActivityTracker>,
) -> JoinHandle<()>
where
    S: Send + Sync + 'static,
{
    tokio::spawn(async move {
        while let Some(batch) = watcher.recv().await {
            activity.touch();
            apply_batch(&manager, batch).await;
        }
    })
}

async fn reload<S: Send + Sync + 'static>(manager: &SnapshotManager<S>) {
    if let Err(e) = manager.reload().await {
        warn!(error = %e, "workspace reload failed");
    }
}

async fn apply_batch<S: Send + Sync + 'static>(manager: &SnapshotManager<S>, batch: WatchBatch) {
    match batch {
        WatchBatch::FullReload => {
            info!("full reload triggered");
            reload(manager).await;
        }
        WatchBatch::Changed(events) => {
            for event in events {
                match event.kind {
                    ChangeKind::Modified => match std::fs::read_to_string(&event.path) {
                        Ok(text) => match manager.apply_edit(&event.path, &text).await {
                            Ok(true) => {}
                            Ok(false) => reload(manager).await,
                            Err(e) => {
                                warn!(error = %e, path = %event.path.display(), "edit application failed");
                            }
                        },
                        Err(e) => {
                            warn!(error = %e, path = %event.path.display(), "failed to read changed file, reloading");
                            reload(manager).await;
                        }
                    },
                    ChangeKind::Created | ChangeKind::Deleted | ChangeKind::Renamed => {
                        reload(manager).await;
                    }
                }
            }
        }
    }
}
