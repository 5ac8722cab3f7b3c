// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result envelopes shaped by the query dispatcher (§4.6).
//!
//! Application-level outcomes (`document_not_found`, `symbol_not_found`) ride
//! in these envelopes as a successful JSON-RPC `result` — they are never
//! JSON-RPC `error` responses (§4.3, §7).

use rq_core::{Diagnostic, Location, SymbolDescriptor, SymbolKind};
use serde::{Deserialize, Serialize};

use crate::error_code::ApplicationErrorCode;

/// Shared by `definition` and `base-definition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_kind: Option<SymbolKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl DefinitionEnvelope {
    pub fn found(location: Location, symbol_name: impl Into<String>, symbol_kind: SymbolKind) -> Self {
        Self {
            success: true,
            location: Some(location),
            symbol_name: Some(symbol_name.into()),
            symbol_kind: Some(symbol_kind),
            error_code: None,
        }
    }

    pub fn not_found(code: ApplicationErrorCode) -> Self {
        Self {
            success: false,
            location: None,
            symbol_name: None,
            symbol_kind: None,
            error_code: Some(code.as_str().to_string()),
        }
    }
}

/// Shared by `implementations`, `references`, `callers`, `callees`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationsEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl LocationsEnvelope {
    pub fn found(symbol_name: impl Into<String>, locations: Vec<Location>) -> Self {
        Self { success: true, symbol_name: Some(symbol_name.into()), locations, error_code: None }
    }

    pub fn not_found(code: ApplicationErrorCode) -> Self {
        Self { success: false, symbol_name: None, locations: vec![], error_code: Some(code.as_str().to_string()) }
    }
}

/// Result of `symbol`: the symbol descriptor flattened alongside `success`.
///
/// `serde(flatten)` can't be paired with `skip_serializing_if`, so this type
/// implements `Serialize`/`Deserialize` by hand rather than deriving them —
/// the descriptor's fields sit at the envelope's top level only when present.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEnvelope {
    pub success: bool,
    pub symbol: Option<SymbolDescriptor>,
    pub error_code: Option<String>,
}

impl SymbolEnvelope {
    pub fn found(symbol: SymbolDescriptor) -> Self {
        Self { success: true, symbol: Some(symbol), error_code: None }
    }

    pub fn not_found(code: ApplicationErrorCode) -> Self {
        Self { success: false, symbol: None, error_code: Some(code.as_str().to_string()) }
    }
}

impl Serialize for SymbolEnvelope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut value = serde_json::to_value(&self.symbol)
            .map_err(serde::ser::Error::custom)?
            .as_object()
            .cloned()
            .unwrap_or_default();
        value.insert("success".to_string(), serde_json::Value::Bool(self.success));
        if let Some(code) = &self.error_code {
            value.insert("error_code".to_string(), serde_json::Value::String(code.clone()));
        }
        let mut map = serializer.serialize_map(Some(value.len()))?;
        for (k, v) in value {
            map.serialize_entry(&k, &v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SymbolEnvelope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut value = serde_json::Value::deserialize(deserializer)?;
        let obj = value.as_object_mut().ok_or_else(|| serde::de::Error::custom("expected object"))?;
        let success = obj
            .remove("success")
            .and_then(|v| v.as_bool())
            .ok_or_else(|| serde::de::Error::custom("missing `success`"))?;
        let error_code = obj.remove("error_code").and_then(|v| v.as_str().map(str::to_string));
        let symbol = if success {
            Some(
                serde_json::from_value(serde_json::Value::Object(obj.clone()))
                    .map_err(serde::de::Error::custom)?,
            )
        } else {
            None
        };
        Ok(Self { success, symbol, error_code })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsEnvelope {
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
}

impl DiagnosticsEnvelope {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        use rq_core::Severity;
        let error_count = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
        let warning_count = diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();
        let info_count = diagnostics.iter().filter(|d| d.severity == Severity::Info).count();
        Self { success: true, diagnostics, error_count, warning_count, info_count }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingEnvelope {
    pub status: String,
    pub idle_timeout_minutes: u32,
    pub idle_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShutdownEnvelope {
    pub status: String,
}

impl Default for ShutdownEnvelope {
    fn default() -> Self {
        Self { status: "shutting_down".to_string() }
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
