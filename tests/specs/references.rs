//! S3 (references returns every call site, including both occurrences of
//! repeated usage) from §8.

use serial_test::serial;

use crate::prelude::*;

#[test]
#[serial]
fn s3_references_lists_every_call_site_of_the_symbol() {
    let ws = Workspace::single_file();

    let assert = ws
        .rq()
        .arg("--json")
        .arg("references")
        .arg(DEFINITION_FILE)
        .arg(DEFINITION_DECL_LINE.to_string())
        .arg(DEFINITION_DECL_COLUMN.to_string())
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let result: serde_json::Value = serde_json::from_str(stdout.trim()).expect("decode json result");

    assert_eq!(result["success"], serde_json::json!(true));
    assert_eq!(result["symbol_name"], serde_json::json!("M"));

    let locations = result["locations"].as_array().expect("locations array");
    assert_eq!(locations.len(), 2);
    let lines: Vec<u64> = locations.iter().map(|l| l["line"].as_u64().expect("line")).collect();
    assert!(lines.contains(&u64::from(DEFINITION_CALL_1_LINE)));
    assert!(lines.contains(&u64::from(DEFINITION_CALL_2_LINE)));
    for location in locations {
        assert_eq!(location["file"], serde_json::json!(DEFINITION_FILE));
        assert_eq!(location["column"], serde_json::json!(DEFINITION_CALL_1_COLUMN));
    }

    ws.rq().arg("shutdown").assert().success();
}

#[test]
#[serial]
fn s3_references_can_include_the_definition_itself() {
    let ws = Workspace::single_file();

    let assert = ws
        .rq()
        .arg("--json")
        .arg("references")
        .arg("--include-definition")
        .arg(DEFINITION_FILE)
        .arg(DEFINITION_DECL_LINE.to_string())
        .arg(DEFINITION_DECL_COLUMN.to_string())
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let result: serde_json::Value = serde_json::from_str(stdout.trim()).expect("decode json result");

    let locations = result["locations"].as_array().expect("locations array");
    assert_eq!(locations.len(), 3);
    assert_eq!(locations[0]["line"], serde_json::json!(DEFINITION_DECL_LINE));
    assert_eq!(locations[0]["column"], serde_json::json!(DEFINITION_DECL_COLUMN));

    ws.rq().arg("shutdown").assert().success();
}
