// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn point_location_has_no_span_fields() {
    let loc = Location::point("T.cs", 1, 24);
    let json = serde_json::to_value(&loc).expect("serialize");
    assert!(json.get("end_line").is_none());
    assert!(json.get("end_column").is_none());
}

#[test]
fn span_location_round_trips() {
    let loc = Location::span("T.cs", 1, 1, 1, 10);
    let json = serde_json::to_string(&loc).expect("serialize");
    let back: Location = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(loc, back);
}

#[test]
fn position_deserializes_from_json() {
    let pos: Position =
        serde_json::from_str(r#"{"file":"T.cs","line":1,"column":50}"#).expect("deserialize");
    assert_eq!(pos, Position { file: "T.cs".into(), line: 1, column: 50 });
}
