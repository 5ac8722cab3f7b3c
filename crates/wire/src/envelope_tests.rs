// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rq_core::{Position, Severity};

fn loc() -> Location {
    Location::point("T.cs".to_string(), 10, 4)
}

#[test]
fn definition_not_found_omits_location_fields() {
    let env = DefinitionEnvelope::not_found(ApplicationErrorCode::SymbolNotFound);
    let json = serde_json::to_value(&env).expect("serialize");
    assert!(json.get("location").is_none());
    assert!(json.get("symbol_name").is_none());
    assert!(json.get("symbol_kind").is_none());
    assert_eq!(json["error_code"], "symbol_not_found");
}

#[test]
fn definition_found_carries_location_and_kind() {
    let env = DefinitionEnvelope::found(loc(), "Foo", SymbolKind::Class);
    let json = serde_json::to_value(&env).expect("serialize");
    assert_eq!(json["success"], true);
    assert_eq!(json["symbol_name"], "Foo");
    assert_eq!(json["symbol_kind"], "class");
    assert!(json.get("error_code").is_none());
}

#[test]
fn locations_not_found_has_empty_locations_and_no_symbol_name() {
    let env = LocationsEnvelope::not_found(ApplicationErrorCode::DocumentNotFound);
    let json = serde_json::to_value(&env).expect("serialize");
    assert!(json.get("symbol_name").is_none());
    assert_eq!(json["locations"], serde_json::json!([]));
    assert_eq!(json["error_code"], "document_not_found");
}

#[test]
fn locations_found_lists_all_locations() {
    let env = LocationsEnvelope::found("Bar", vec![loc(), loc()]);
    let json = serde_json::to_value(&env).expect("serialize");
    assert_eq!(json["locations"].as_array().expect("array").len(), 2);
}

fn descriptor() -> SymbolDescriptor {
    SymbolDescriptor {
        name: "Foo".to_string(),
        kind: SymbolKind::Method,
        full_name: "N.Foo".to_string(),
        signature: None,
        documentation: None,
        containing_type: None,
        containing_namespace: None,
        return_type: None,
        accessibility: None,
        modifiers: vec![],
        location: None,
    }
}

#[test]
fn symbol_found_flattens_descriptor_fields_at_top_level() {
    let env = SymbolEnvelope::found(descriptor());
    let json = serde_json::to_value(&env).expect("serialize");
    assert_eq!(json["success"], true);
    assert_eq!(json["name"], "Foo");
    assert_eq!(json["full_name"], "N.Foo");
    assert!(json.get("symbol").is_none());
}

#[test]
fn symbol_not_found_has_no_descriptor_fields() {
    let env = SymbolEnvelope::not_found(ApplicationErrorCode::SymbolNotFound);
    let json = serde_json::to_value(&env).expect("serialize");
    assert_eq!(json["success"], false);
    assert!(json.get("name").is_none());
    assert_eq!(json["error_code"], "symbol_not_found");
}

#[test]
fn symbol_envelope_round_trips() {
    let env = SymbolEnvelope::found(descriptor());
    let json = serde_json::to_string(&env).expect("serialize");
    let back: SymbolEnvelope = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, env);
}

#[test]
fn diagnostics_envelope_tallies_by_severity() {
    let diagnostics = vec![
        Diagnostic { id: "CS0001".to_string(), severity: Severity::Error, message: "e".to_string(), location: None },
        Diagnostic { id: "CS0002".to_string(), severity: Severity::Warning, message: "w".to_string(), location: None },
        Diagnostic { id: "CS0003".to_string(), severity: Severity::Warning, message: "w2".to_string(), location: None },
        Diagnostic { id: "CS0004".to_string(), severity: Severity::Info, message: "i".to_string(), location: None },
    ];
    let env = DiagnosticsEnvelope::new(diagnostics);
    assert_eq!(env.error_count, 1);
    assert_eq!(env.warning_count, 2);
    assert_eq!(env.info_count, 1);
    assert!(env.success);
}

#[test]
fn ping_envelope_round_trips() {
    let env = PingEnvelope { status: "ok".to_string(), idle_timeout_minutes: 30, idle_seconds: 12 };
    let json = serde_json::to_string(&env).expect("serialize");
    let back: PingEnvelope = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.idle_seconds, 12);
}

#[test]
fn shutdown_envelope_defaults_to_shutting_down() {
    assert_eq!(ShutdownEnvelope::default().status, "shutting_down");
}

#[test]
fn position_is_reachable_from_location() {
    let _ = Position { file: "T.cs".to_string(), line: 1, column: 1 };
}
