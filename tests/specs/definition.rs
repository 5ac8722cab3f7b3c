//! S1 (jump to a known symbol's definition) and S2 (no symbol at the given
//! position) from §8.

use serial_test::serial;

use crate::prelude::*;

#[test]
#[serial]
fn s1_definition_jumps_from_a_call_site_to_its_declaration() {
    let ws = Workspace::single_file();

    let assert = ws
        .rq()
        .arg("--json")
        .arg("definition")
        .arg(DEFINITION_FILE)
        .arg(DEFINITION_CALL_1_LINE.to_string())
        .arg(DEFINITION_CALL_1_COLUMN.to_string())
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let result: serde_json::Value = serde_json::from_str(stdout.trim()).expect("decode json result");

    assert_eq!(result["success"], serde_json::json!(true));
    assert_eq!(result["symbol_name"], serde_json::json!("M"));
    assert_eq!(result["symbol_kind"], serde_json::json!("method"));
    assert_eq!(result["location"]["file"], serde_json::json!(DEFINITION_FILE));
    assert_eq!(result["location"]["line"], serde_json::json!(DEFINITION_DECL_LINE));
    assert_eq!(result["location"]["column"], serde_json::json!(DEFINITION_DECL_COLUMN));

    ws.rq().arg("shutdown").assert().success();
    wait_for(5_000, || !ws.pid_path().exists());
}

#[test]
#[serial]
fn s2_definition_reports_no_symbol_at_a_position_with_nothing_at_it() {
    let ws = Workspace::single_file();

    // Line 1, column 1 sits on the `namespace` keyword — no method
    // declaration or call expression starts there.
    let assert = ws.rq().arg("--json").arg("definition").arg(DEFINITION_FILE).arg("1").arg("1").assert();

    // §6: a query envelope with `success: false` is still a clean client
    // exit — reserved for protocol/connection failures, not "no result".
    assert.code(1);
}

#[test]
#[serial]
fn s2_definition_reports_document_not_found_for_an_unknown_file() {
    let ws = Workspace::single_file();

    let assert = ws.rq().arg("--json").arg("definition").arg("Missing.cs").arg("1").arg("1").assert();
    let output = assert.get_output();
    let stdout = String::from_utf8(output.stdout.clone()).expect("utf8 stdout");
    let result: serde_json::Value = serde_json::from_str(stdout.trim()).expect("decode json result");

    assert_eq!(result["success"], serde_json::json!(false));
    assert_eq!(result["error_code"], serde_json::json!("document_not_found"));
}
