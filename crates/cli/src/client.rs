// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC client (§4.3): one socket, serialized requests, single-shot failure.
//!
//! The corpus's own `crates/cli/src/client.rs` wasn't retained in this pack —
//! only its call sites (`self.send(&request).await?`) survive elsewhere — so
//! this is rebuilt from the wire contract (§4.2, §4.3) rather than copied.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rq_wire::{read_frame, write_frame, CodecError, Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to daemon socket {0}: {1}")]
    Connect(PathBuf, std::io::Error),

    #[error("timed out connecting to daemon socket {0}")]
    ConnectTimeout(PathBuf),

    #[error("connection to daemon closed")]
    Closed,

    #[error("wire error: {0}")]
    Wire(#[from] CodecError),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One persistent connection to the daemon. Concurrent [`request`] calls are
/// serialized by an internal mutex so framing is never interleaved (§4.3).
/// A failed send closes the client: subsequent requests fail immediately with
/// [`ClientError::Closed`] rather than reopening the socket.
///
/// [`request`]: DaemonClient::request
pub struct DaemonClient {
    stream: Mutex<Option<UnixStream>>,
}

impl DaemonClient {
    /// Connect within `deadline`. Does not retry — backoff across attempts
    /// is the launcher's responsibility (§4.8), not the client's.
    pub async fn connect(socket_path: &Path, deadline: Duration) -> Result<Self, ClientError> {
        let stream = tokio::time::timeout(deadline, UnixStream::connect(socket_path))
            .await
            .map_err(|_| ClientError::ConnectTimeout(socket_path.to_path_buf()))?
            .map_err(|e| ClientError::Connect(socket_path.to_path_buf(), e))?;
        Ok(Self { stream: Mutex::new(Some(stream)) })
    }

    /// Send one request and await its response.
    pub async fn request(&self, method: &str, params: serde_json::Value) -> Result<Response, ClientError> {
        let id = nanoid::nanoid!(10);
        let request = Request::new(id, method, params);
        self.send(&request).await
    }

    async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let mut guard = self.stream.lock().await;
        let stream = guard.as_mut().ok_or(ClientError::Closed)?;

        let result = Self::exchange(stream, request).await;
        if result.is_err() {
            *guard = None;
        }
        result
    }

    async fn exchange(stream: &mut UnixStream, request: &Request) -> Result<Response, ClientError> {
        let payload = serde_json::to_vec(request)?;
        write_frame(stream, &payload).await?;

        let frame = read_frame(stream).await?.ok_or(ClientError::Closed)?;
        let response: Response = serde_json::from_slice(&frame)?;
        Ok(response)
    }

    /// Close the connection explicitly (§4.3 `close()`).
    pub async fn close(&self) {
        *self.stream.lock().await = None;
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
