//! S6 (a frame over the wire bound) from §8: the daemon must close the
//! connection without crashing or replying, and must keep accepting other
//! connections afterward.

use serial_test::serial;
use tokio::io::AsyncWriteExt;

use crate::prelude::*;

#[tokio::test]
#[serial]
async fn s6_an_oversized_frame_closes_the_connection_without_a_response() {
    let ws = Workspace::single_file();
    ws.rq().arg("ping").assert().success();

    let socket = ws.socket_path();
    let mut stream = connect(&socket).await;

    // One byte past `rq_wire::MAX_FRAME_LEN`; the payload itself is never
    // sent — `read_frame` rejects the length prefix before reading a body.
    let oversized_len = (rq_wire::MAX_FRAME_LEN + 1) as u32;
    stream.write_all(&oversized_len.to_le_bytes()).await.expect("write oversized length prefix");
    stream.flush().await.expect("flush");

    let outcome = rq_wire::read_frame(&mut stream).await;
    assert!(matches!(outcome, Ok(None)), "server must close the connection rather than reply: {outcome:?}");

    // The daemon itself must still be alive and serving other connections.
    let mut follow_up = connect(&socket).await;
    let response = request(&mut follow_up, "s6-follow-up", "ping", serde_json::Value::Null).await;
    assert!(!response.is_error());

    ws.rq().arg("shutdown").assert().success();
}
