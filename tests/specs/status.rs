//! `rq status` (§12 supplement): reports daemon presence without spawning one.

use serial_test::serial;

use crate::prelude::*;

#[test]
#[serial]
fn status_reports_not_running_for_a_workspace_with_no_daemon() {
    let ws = Workspace::single_file();

    let assert = ws.rq().arg("--json").arg("status").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let status: serde_json::Value = serde_json::from_str(stdout.trim()).expect("decode json status");

    assert_eq!(status["running"], serde_json::json!(false));
    assert_eq!(status["responsive"], serde_json::json!(false));
    assert!(status.get("pid").is_none());
}

#[test]
#[serial]
fn status_reports_running_and_responsive_once_a_query_has_spawned_a_daemon() {
    let ws = Workspace::single_file();

    ws.rq().arg("ping").assert().success();

    let assert = ws.rq().arg("--json").arg("status").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let status: serde_json::Value = serde_json::from_str(stdout.trim()).expect("decode json status");

    assert_eq!(status["running"], serde_json::json!(true));
    assert_eq!(status["responsive"], serde_json::json!(true));
    assert!(status["pid"].as_u64().is_some());

    ws.rq().arg("shutdown").assert().success();
}
