// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Length-prefixed framing (§4.2): a 4-byte little-endian length prefix
//! followed by that many bytes of UTF-8 JSON. Bounded to 10 MiB.

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Maximum accepted frame payload size.
pub const MAX_FRAME_LEN: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("frame length {0} exceeds the {MAX_FRAME_LEN}-byte bound")]
    TooLarge(usize),

    #[error("frame length is zero")]
    Empty,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write one frame: a 4-byte little-endian length prefix then `payload`.
pub async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    payload: &[u8],
) -> Result<(), CodecError> {
    if payload.is_empty() {
        return Err(CodecError::Empty);
    }
    if payload.len() > MAX_FRAME_LEN {
        return Err(CodecError::TooLarge(payload.len()));
    }
    let len = payload.len() as u32;
    writer.write_all(&len.to_le_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one frame. Returns `Ok(None)` on a clean EOF before any bytes of a
/// new frame have arrived; returns `Err` and the caller must close the
/// connection for a malformed or out-of-bounds length (§4.2, §4.3).
pub async fn read_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<Option<Vec<u8>>, CodecError> {
    let mut len_buf = [0u8; 4];
    if !read_exact_or_eof(reader, &mut len_buf).await? {
        return Ok(None);
    }
    let len = u32::from_le_bytes(len_buf) as usize;
    if len == 0 {
        return Err(CodecError::Empty);
    }
    if len > MAX_FRAME_LEN {
        return Err(CodecError::TooLarge(len));
    }
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;
    Ok(Some(payload))
}

/// Like `AsyncReadExt::read_exact`, but returns `Ok(false)` instead of an
/// `UnexpectedEof` error when zero bytes were read before EOF — that's a
/// clean connection close, not a protocol error.
async fn read_exact_or_eof<R: AsyncRead + Unpin>(
    reader: &mut R,
    buf: &mut [u8],
) -> Result<bool, CodecError> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(false);
            }
            return Err(CodecError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed mid-frame",
            )));
        }
        filled += n;
    }
    Ok(true)
}

/// Lowercase every object key in a JSON value, recursively, so the decoder
/// accepts client variations in property casing (§4.2) while the encoder
/// still emits one canonical casing.
pub fn normalize_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(k.to_lowercase(), normalize_keys(v));
            }
            serde_json::Value::Object(out)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(normalize_keys).collect())
        }
        other => other,
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
