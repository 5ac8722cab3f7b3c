// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The dispatcher itself: method name → params decode → snapshot read →
//! analyzer call → envelope (§4.6).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rq_adapters::{AnalyzerAdapter, SymbolHandle};
use rq_core::{Location, Position, Severity};
use rq_storage::{Snapshot, SnapshotManager};
use rq_wire::{
    ApplicationErrorCode, DefinitionEnvelope, DiagnosticsEnvelope, DiagnosticsParams, ErrorObject,
    LocationsEnvelope, PingEnvelope, ProtocolErrorCode, ReferencesParams, Request, Response,
    ShutdownEnvelope, SymbolEnvelope,
};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::context::DaemonContext;
use crate::error::DispatchError;

/// The result of dispatching one request: the response to write back, and
/// whether the connection handler must initiate shutdown once it has
/// (§4.6 `shutdown`: "replies first, then initiates").
pub struct DispatchOutcome {
    pub response: Response,
    pub shutdown_after: bool,
}

impl DispatchOutcome {
    fn reply(response: Response) -> Self {
        Self { response, shutdown_after: false }
    }
}

pub struct Dispatcher<A: AnalyzerAdapter> {
    manager: Arc<SnapshotManager<A::State>>,
    analyzer: Arc<A>,
    context: Arc<dyn DaemonContext>,
}

impl<A: AnalyzerAdapter> Dispatcher<A> {
    pub fn new(manager: Arc<SnapshotManager<A::State>>, analyzer: Arc<A>, context: Arc<dyn DaemonContext>) -> Self {
        Self { manager, analyzer, context }
    }

    pub async fn dispatch(&self, request: &Request, cancel: &CancellationToken) -> DispatchOutcome {
        let result = self.dispatch_inner(request, cancel).await;
        match result {
            Ok(outcome) => outcome,
            Err(DispatchError::UnknownMethod(method)) => {
                warn!(%method, "method not found");
                DispatchOutcome::reply(Response::error(
                    &request.id,
                    ErrorObject::from_protocol(
                        ProtocolErrorCode::MethodNotFound,
                        format!("unknown method: {method}"),
                    ),
                ))
            }
            Err(DispatchError::InvalidParams { method, reason }) => {
                warn!(%method, %reason, "invalid params");
                DispatchOutcome::reply(Response::error(
                    &request.id,
                    ErrorObject::from_protocol(ProtocolErrorCode::InvalidParams, reason),
                ))
            }
        }
    }

    async fn dispatch_inner(&self, request: &Request, cancel: &CancellationToken) -> Result<DispatchOutcome, DispatchError> {
        let id = request.id.clone();

        let result = match request.method.as_str() {
            "definition" => {
                let position = decode_position(request)?;
                self.definition(&position, cancel).await
            }
            "base-definition" => {
                let position = decode_position(request)?;
                self.base_definition(&position, cancel).await
            }
            "implementations" => {
                let position = decode_position(request)?;
                self.locations(&position, cancel, |a, s, h, c| {
                    Box::pin(a.implementations(s, h, c))
                })
                .await
            }
            "references" => {
                let params: ReferencesParams = decode_params(request)?;
                self.references(&params, cancel).await
            }
            "callers" => {
                let position = decode_position(request)?;
                self.locations(&position, cancel, |a, s, h, c| Box::pin(a.callers(s, h, c))).await
            }
            "callees" => {
                let position = decode_position(request)?;
                self.callees(&position, cancel).await
            }
            "symbol" => {
                let position = decode_position(request)?;
                self.symbol(&position, cancel).await
            }
            "diagnostics" => {
                let params: DiagnosticsParams = decode_params(request)?;
                self.diagnostics(&params, cancel).await
            }
            "ping" => self.ping(),
            "shutdown" => return Ok(self.shutdown(&id)),
            other => return Err(DispatchError::UnknownMethod(other.to_string())),
        };

        Ok(DispatchOutcome::reply(Response::result(&id, result)))
    }

    async fn resolve(
        &self,
        snapshot: &Snapshot<A::State>,
        position: &Position,
        cancel: &CancellationToken,
    ) -> Result<SymbolHandle, ApplicationErrorCode> {
        let path = canonical_position_path(snapshot.root(), &position.file);
        if snapshot.document(&path).is_none() {
            return Err(ApplicationErrorCode::DocumentNotFound);
        }
        self.analyzer
            .symbol_at(snapshot.analyzer_state(), &path, position.line, position.column, cancel)
            .await
            .ok_or(ApplicationErrorCode::SymbolNotFound)
    }

    async fn symbol_name(&self, snapshot: &Snapshot<A::State>, handle: SymbolHandle, cancel: &CancellationToken) -> String {
        self.analyzer.describe(snapshot.analyzer_state(), handle, cancel).await.name
    }

    async fn definition(&self, position: &Position, cancel: &CancellationToken) -> serde_json::Value {
        let snapshot = self.manager.current();
        let envelope = match self.resolve(&snapshot, position, cancel).await {
            Ok(handle) => match self.analyzer.definition(snapshot.analyzer_state(), handle, cancel).await {
                Some((location, name, kind)) => {
                    DefinitionEnvelope::found(rooted(&snapshot, location), name, kind)
                }
                None => DefinitionEnvelope::not_found(ApplicationErrorCode::SymbolNotFound),
            },
            Err(code) => DefinitionEnvelope::not_found(code),
        };
        to_value(&envelope)
    }

    async fn base_definition(&self, position: &Position, cancel: &CancellationToken) -> serde_json::Value {
        let snapshot = self.manager.current();
        let envelope = match self.resolve(&snapshot, position, cancel).await {
            Ok(handle) => match self.analyzer.base_definition(snapshot.analyzer_state(), handle, cancel).await {
                Some((location, name, kind)) => {
                    DefinitionEnvelope::found(rooted(&snapshot, location), name, kind)
                }
                None => DefinitionEnvelope::not_found(ApplicationErrorCode::SymbolNotFound),
            },
            Err(code) => DefinitionEnvelope::not_found(code),
        };
        to_value(&envelope)
    }

    /// Shared shape for `implementations`/`callers` — a single analyzer call
    /// whose locations need no dedup or prepending.
    async fn locations<'a, F>(&'a self, position: &Position, cancel: &CancellationToken, call: F) -> serde_json::Value
    where
        F: for<'b> FnOnce(
            &'b A,
            &'b A::State,
            SymbolHandle,
            &'b CancellationToken,
        ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Vec<Location>> + Send + 'b>>,
    {
        let snapshot = self.manager.current();
        let envelope = match self.resolve(&snapshot, position, cancel).await {
            Ok(handle) => {
                let name = self.symbol_name(&snapshot, handle, cancel).await;
                let locations = call(&self.analyzer, snapshot.analyzer_state(), handle, cancel).await;
                LocationsEnvelope::found(name, reroot(&snapshot, locations))
            }
            Err(code) => LocationsEnvelope::not_found(code),
        };
        to_value(&envelope)
    }

    async fn references(&self, params: &ReferencesParams, cancel: &CancellationToken) -> serde_json::Value {
        let snapshot = self.manager.current();
        let envelope = match self.resolve(&snapshot, &params.position, cancel).await {
            Ok(handle) => {
                let name = self.symbol_name(&snapshot, handle, cancel).await;
                let mut locations = self.analyzer.references(snapshot.analyzer_state(), handle, cancel).await;
                if params.include_definition {
                    if let Some((location, _, _)) =
                        self.analyzer.definition(snapshot.analyzer_state(), handle, cancel).await
                    {
                        locations.insert(0, location);
                    }
                }
                LocationsEnvelope::found(name, reroot(&snapshot, locations))
            }
            Err(code) => LocationsEnvelope::not_found(code),
        };
        to_value(&envelope)
    }

    async fn callees(&self, position: &Position, cancel: &CancellationToken) -> serde_json::Value {
        let snapshot = self.manager.current();
        let envelope = match self.resolve(&snapshot, position, cancel).await {
            Ok(handle) => {
                let name = self.symbol_name(&snapshot, handle, cancel).await;
                let locations = self.analyzer.callees(snapshot.analyzer_state(), handle, cancel).await;
                LocationsEnvelope::found(name, dedup(reroot(&snapshot, locations)))
            }
            Err(code) => LocationsEnvelope::not_found(code),
        };
        to_value(&envelope)
    }

    async fn symbol(&self, position: &Position, cancel: &CancellationToken) -> serde_json::Value {
        let snapshot = self.manager.current();
        let envelope = match self.resolve(&snapshot, position, cancel).await {
            Ok(handle) => {
                let mut descriptor = self.analyzer.describe(snapshot.analyzer_state(), handle, cancel).await;
                descriptor.location = descriptor.location.map(|loc| rooted(&snapshot, loc));
                SymbolEnvelope::found(descriptor)
            }
            Err(code) => SymbolEnvelope::not_found(code),
        };
        to_value(&envelope)
    }

    async fn diagnostics(&self, params: &DiagnosticsParams, cancel: &CancellationToken) -> serde_json::Value {
        let snapshot = self.manager.current();
        let file = params.file.as_deref().map(|f| canonical_position_path(snapshot.root(), f));
        let mut diagnostics =
            self.analyzer.diagnostics(snapshot.analyzer_state(), file.as_deref(), cancel).await;
        diagnostics.retain(|d| match d.severity {
            Severity::Error => true,
            Severity::Warning => params.include_warnings,
            Severity::Info => params.include_info,
        });
        for d in &mut diagnostics {
            if let Some(loc) = d.location.take() {
                d.location = Some(rooted(&snapshot, loc));
            }
        }
        to_value(&DiagnosticsEnvelope::new(diagnostics))
    }

    fn ping(&self) -> serde_json::Value {
        to_value(&PingEnvelope {
            status: "ok".to_string(),
            idle_timeout_minutes: self.context.idle_timeout_minutes(),
            idle_seconds: self.context.idle_seconds(),
        })
    }

    fn shutdown(&self, id: &str) -> DispatchOutcome {
        let response = Response::result(id, to_value(&ShutdownEnvelope::default()));
        DispatchOutcome { response, shutdown_after: true }
    }
}

fn decode_position(request: &Request) -> Result<Position, DispatchError> {
    decode_params(request)
}

fn decode_params<T: serde::de::DeserializeOwned>(request: &Request) -> Result<T, DispatchError> {
    serde_json::from_value(request.params.clone()).map_err(|e| DispatchError::InvalidParams {
        method: request.method.clone(),
        reason: e.to_string(),
    })
}

/// Position's `file` may be absolute or workspace-root-relative (§4.6).
fn canonical_position_path(root: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn rooted<A>(snapshot: &Snapshot<A>, mut location: Location) -> Location {
    location.file = snapshot.display_path(Path::new(&location.file));
    location
}

fn reroot<A>(snapshot: &Snapshot<A>, locations: Vec<Location>) -> Vec<Location> {
    locations.into_iter().map(|l| rooted(snapshot, l)).collect()
}

fn dedup(locations: Vec<Location>) -> Vec<Location> {
    let mut seen = Vec::new();
    locations
        .into_iter()
        .filter(|l| {
            if seen.contains(l) {
                false
            } else {
                seen.push(l.clone());
                true
            }
        })
        .collect()
}

fn to_value<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
