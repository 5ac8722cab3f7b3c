//! S5 (a query racing a workspace reload) from §8: touching the project
//! manifest while a query is in flight must never crash the daemon or wedge
//! the connection — the query either completes against the old snapshot or
//! the new one, but always completes.

use serial_test::serial;

use crate::prelude::*;

#[tokio::test]
#[serial]
async fn s5_a_query_survives_a_concurrent_workspace_reload() {
    let ws = Workspace::single_file();
    ws.rq().arg("ping").assert().success();

    let socket = ws.socket_path();
    let mut stream = connect(&socket).await;

    let query = request(
        &mut stream,
        "s5",
        "references",
        serde_json::json!({"file": DEFINITION_FILE, "line": DEFINITION_DECL_LINE, "column": DEFINITION_DECL_COLUMN}),
    );

    // Touching the manifest is a `ChangeKind::Created`/`Renamed`-shaped event
    // for any watcher backend that doesn't diff manifest content, and
    // unconditionally triggers a full reload (`watcher_task::apply_batch`),
    // raced against the in-flight query above rather than sequenced before it.
    let touch = async {
        ws.file("proj.csproj", "<Project Sdk=\"Microsoft.NET.Sdk\"></Project>\n<!-- touched -->\n");
    };
    let (response, ()) = tokio::join!(query, touch);
    assert!(!response.is_error(), "reload must not turn a query into a protocol error");

    // The connection and the daemon itself must still be usable afterward.
    let follow_up = request(&mut stream, "s5-follow-up", "ping", serde_json::Value::Null).await;
    assert!(!follow_up.is_error());

    ws.rq().arg("shutdown").assert().success();
}
