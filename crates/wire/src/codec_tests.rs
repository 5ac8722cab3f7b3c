// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Cursor;

#[tokio::test]
async fn round_trips_a_small_payload() {
    let mut buf = Vec::new();
    write_frame(&mut buf, b"{\"a\":1}").await.expect("write");
    let mut cursor = Cursor::new(buf);
    let payload = read_frame(&mut cursor).await.expect("read").expect("some frame");
    assert_eq!(payload, b"{\"a\":1}");
}

#[tokio::test]
async fn reads_two_frames_back_to_back() {
    let mut buf = Vec::new();
    write_frame(&mut buf, b"one").await.expect("write");
    write_frame(&mut buf, b"two").await.expect("write");
    let mut cursor = Cursor::new(buf);
    assert_eq!(read_frame(&mut cursor).await.expect("read").expect("some"), b"one");
    assert_eq!(read_frame(&mut cursor).await.expect("read").expect("some"), b"two");
}

#[tokio::test]
async fn clean_eof_before_any_frame_bytes_returns_none() {
    let mut cursor = Cursor::new(Vec::<u8>::new());
    assert_eq!(read_frame(&mut cursor).await.expect("read"), None);
}

#[tokio::test]
async fn eof_mid_length_prefix_is_an_error() {
    let mut cursor = Cursor::new(vec![0x01, 0x00]);
    let err = read_frame(&mut cursor).await.expect_err("should error");
    assert!(matches!(err, CodecError::Io(_)));
}

#[tokio::test]
async fn eof_mid_payload_is_an_error() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&10u32.to_le_bytes());
    buf.extend_from_slice(b"short");
    let mut cursor = Cursor::new(buf);
    let err = read_frame(&mut cursor).await.expect_err("should error");
    assert!(matches!(err, CodecError::Io(_)));
}

#[tokio::test]
async fn rejects_zero_length_frame() {
    let mut cursor = Cursor::new(0u32.to_le_bytes().to_vec());
    let err = read_frame(&mut cursor).await.expect_err("should error");
    assert!(matches!(err, CodecError::Empty));
}

#[tokio::test]
async fn rejects_frame_over_max_len() {
    let over = (MAX_FRAME_LEN as u32) + 1;
    let mut cursor = Cursor::new(over.to_le_bytes().to_vec());
    let err = read_frame(&mut cursor).await.expect_err("should error");
    assert!(matches!(err, CodecError::TooLarge(n) if n == over as usize));
}

#[tokio::test]
async fn write_frame_rejects_empty_payload() {
    let mut buf = Vec::new();
    let err = write_frame(&mut buf, b"").await.expect_err("should error");
    assert!(matches!(err, CodecError::Empty));
}

#[tokio::test]
async fn write_frame_rejects_oversized_payload() {
    let payload = vec![0u8; MAX_FRAME_LEN + 1];
    let mut buf = Vec::new();
    let err = write_frame(&mut buf, &payload).await.expect_err("should error");
    assert!(matches!(err, CodecError::TooLarge(n) if n == MAX_FRAME_LEN + 1));
}

#[test]
fn normalize_keys_lowercases_object_keys_recursively() {
    let value = serde_json::json!({"File": "T.cs", "Nested": {"Line": 1}, "List": [{"Column": 2}]});
    let normalized = normalize_keys(value);
    assert_eq!(normalized["file"], "T.cs");
    assert_eq!(normalized["nested"]["line"], 1);
    assert_eq!(normalized["list"][0]["column"], 2);
}

#[test]
fn normalize_keys_leaves_scalars_and_arrays_of_scalars_alone() {
    let value = serde_json::json!(["a", "B", 1, true]);
    assert_eq!(normalize_keys(value.clone()), value);
}
