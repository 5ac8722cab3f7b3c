// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The IPC accept loop (§4.2, §4.3): one Unix domain socket, one task per
//! connection, no Hello/TCP/auth handshake — a single workspace is always
//! local-only and single-tenant.
//!
//! Grounded in the corpus's `crates/daemon/src/listener/mod.rs`, stripped of
//! the TCP listener, the Hello negotiation, and the per-connection auth
//! token check this system has no use for (§12).

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rq_adapters::AnalyzerAdapter;
use rq_engine::{DaemonContext, Dispatcher};
use rq_wire::{normalize_keys, read_frame, write_frame, ErrorObject, ProtocolErrorCode, Request, Response};
use thiserror::Error;
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ListenError {
    #[error("failed to bind unix socket {0}: {1}")]
    Bind(PathBuf, std::io::Error),

    #[error("failed to set permissions on unix socket {0}: {1}")]
    Permissions(PathBuf, std::io::Error),
}

/// Tracks which connection IDs currently have a handler in flight. A plain
/// append-only list would leak one entry per connection for the life of the
/// process (§4.3); every insertion here is paired with a drop-guard that
/// removes it even if the handler task panics.
#[derive(Default)]
struct InFlight {
    ids: Mutex<HashSet<u64>>,
    notify: tokio::sync::Notify,
}

impl InFlight {
    fn enter(self: &Arc<Self>, id: u64) -> InFlightGuard {
        self.ids.lock().insert(id);
        InFlightGuard { table: self.clone(), id }
    }

    fn is_empty(&self) -> bool {
        self.ids.lock().is_empty()
    }
}

struct InFlightGuard {
    table: Arc<InFlight>,
    id: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.table.ids.lock().remove(&self.id);
        self.table.notify.notify_waiters();
    }
}

/// Owns the bound socket and the accept loop. [`Listener::shutdown`] stops
/// accepting new connections and waits (bounded) for in-flight handlers to
/// finish before returning, per the §4.7 shutdown sequence's second step.
pub struct Listener<A: AnalyzerAdapter> {
    socket_path: PathBuf,
    accept_task: JoinHandle<()>,
    accept_cancel: CancellationToken,
    in_flight: Arc<InFlight>,
    _marker: std::marker::PhantomData<A>,
}

impl<A> Listener<A>
where
    A: AnalyzerAdapter + 'static,
{
    /// Bind the socket. Does *not* remove a pre-existing file at
    /// `socket_path` first — a live daemon's socket must make `bind()` fail
    /// so the supervisor can tell "already running" from "stale" by
    /// consulting the PID file (§6 "a second daemon binding the same key
    /// fails on bind()"), not by racing to delete the file out from under it.
    pub fn bind(
        socket_path: PathBuf,
        dispatcher: Arc<Dispatcher<A>>,
        context: Arc<dyn DaemonContext>,
    ) -> Result<Self, ListenError> {
        let listener = UnixListener::bind(&socket_path)
            .map_err(|e| ListenError::Bind(socket_path.clone(), e))?;
        restrict_socket_permissions(&socket_path)?;

        let accept_cancel = CancellationToken::new();
        let in_flight = Arc::new(InFlight::default());
        let next_id = Arc::new(AtomicU64::new(0));

        let task_cancel = accept_cancel.clone();
        let task_in_flight = in_flight.clone();
        let accept_task = tokio::spawn(accept_loop(listener, dispatcher, context, task_cancel, task_in_flight, next_id));

        Ok(Self { socket_path, accept_task, accept_cancel, in_flight, _marker: std::marker::PhantomData })
    }

    pub fn socket_path(&self) -> &std::path::Path {
        &self.socket_path
    }

    /// Stop accepting new connections and wait up to `drain_timeout` for
    /// in-flight handlers to finish (§4.7). Handlers still running after the
    /// deadline are abandoned, not killed — their tasks keep running to
    /// completion in the background while the process tears down around
    /// them, matching the corpus's own best-effort drain.
    pub async fn shutdown(self, drain_timeout: std::time::Duration) {
        self.accept_cancel.cancel();
        let _ = self.accept_task.await;

        let deadline = tokio::time::Instant::now() + drain_timeout;
        while !self.in_flight.is_empty() {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                warn!("drain timeout elapsed with handlers still in flight");
                break;
            }
            let _ = tokio::time::timeout(remaining, self.in_flight.notify.notified()).await;
        }
    }
}

fn restrict_socket_permissions(path: &std::path::Path) -> Result<(), ListenError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
            .map_err(|e| ListenError::Permissions(path.to_path_buf(), e))?;
    }
    Ok(())
}

async fn accept_loop<A: AnalyzerAdapter + 'static>(
    listener: UnixListener,
    dispatcher: Arc<Dispatcher<A>>,
    context: Arc<dyn DaemonContext>,
    cancel: CancellationToken,
    in_flight: Arc<InFlight>,
    next_id: Arc<AtomicU64>,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _addr)) => {
                        let id = next_id.fetch_add(1, Ordering::Relaxed);
                        let guard = in_flight.enter(id);
                        let dispatcher = dispatcher.clone();
                        let context = context.clone();
                        let conn_cancel = cancel.clone();
                        tokio::spawn(async move {
                            let _guard = guard;
                            handle_connection(stream, dispatcher, context, conn_cancel).await;
                        });
                    }
                    Err(e) => warn!(error = %e, "accept failed"),
                }
            }
        }
    }
}

async fn handle_connection<A: AnalyzerAdapter>(
    mut stream: UnixStream,
    dispatcher: Arc<Dispatcher<A>>,
    context: Arc<dyn DaemonContext>,
    cancel: CancellationToken,
) {
    loop {
        let payload = match read_frame(&mut stream).await {
            Ok(None) => return,
            Ok(Some(payload)) => payload,
            Err(e) => {
                debug!(error = %e, "closing connection on frame error");
                return;
            }
        };

        let request = decode_request(&payload);
        let request: Request = match request {
            Ok(request) => request,
            Err(e) => {
                let response = Response::error(
                    "null",
                    ErrorObject::from_protocol(ProtocolErrorCode::ParseError, e.to_string()),
                );
                if write_response(&mut stream, &response).await.is_err() {
                    return;
                }
                continue;
            }
        };
        context.touch_activity();

        let outcome = dispatcher.dispatch(&request, &cancel).await;
        if write_response(&mut stream, &outcome.response).await.is_err() {
            return;
        }

        if outcome.shutdown_after {
            context.request_shutdown();
            return;
        }
    }
}

/// Decode one frame's payload into a [`Request`], lower-casing object keys
/// first so client variations in property casing still parse (§4.2).
fn decode_request(payload: &[u8]) -> Result<Request, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_slice(payload)?;
    serde_json::from_value(normalize_keys(value))
}

async fn write_response(stream: &mut UnixStream, response: &Response) -> Result<(), ()> {
    let bytes = match serde_json::to_vec(response) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "failed to encode response");
            return Err(());
        }
    };
    write_frame(stream, &bytes).await.map_err(|e| {
        debug!(error = %e, "failed to write response frame");
    })
}

#[cfg(test)]
#[path = "listener_tests.rs"]
mod tests;
