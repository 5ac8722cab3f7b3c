// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test doubles for the analyzer seam, in the shape of
//! `crates/adapters/src/notify.rs`'s `fake` submodule: a `Clone` handle
//! over shared interior state, pre-seeded with the answers a test wants and
//! recording every call it receives.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rq_core::{Diagnostic, Location, SymbolDescriptor, SymbolKind};
use tokio_util::sync::CancellationToken;

use crate::analyzer::{AnalyzerAdapter, SymbolHandle};

type DefinitionAnswer = (Location, String, SymbolKind);

#[derive(Default)]
struct FakeState {
    symbol_at: HashMap<(PathBuf, u32, u32), SymbolHandle>,
    definitions: HashMap<SymbolHandle, DefinitionAnswer>,
    base_definitions: HashMap<SymbolHandle, DefinitionAnswer>,
    implementations: HashMap<SymbolHandle, Vec<Location>>,
    references: HashMap<SymbolHandle, Vec<Location>>,
    callers: HashMap<SymbolHandle, Vec<Location>>,
    callees: HashMap<SymbolHandle, Vec<Location>>,
    descriptors: HashMap<SymbolHandle, SymbolDescriptor>,
    diagnostics: Vec<Diagnostic>,
    symbol_at_calls: Vec<(PathBuf, u32, u32)>,
}

/// An `AnalyzerAdapter` fully scripted by the test — it never inspects its
/// `State` (`()`), only the canned answers it was seeded with.
#[derive(Clone, Default)]
pub struct FakeAnalyzerAdapter {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeAnalyzerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_symbol_at(&self, file: impl Into<PathBuf>, line: u32, column: u32, handle: SymbolHandle) {
        self.inner.lock().symbol_at.insert((file.into(), line, column), handle);
    }

    pub fn set_definition(&self, symbol: SymbolHandle, answer: DefinitionAnswer) {
        self.inner.lock().definitions.insert(symbol, answer);
    }

    pub fn set_base_definition(&self, symbol: SymbolHandle, answer: DefinitionAnswer) {
        self.inner.lock().base_definitions.insert(symbol, answer);
    }

    pub fn set_implementations(&self, symbol: SymbolHandle, locations: Vec<Location>) {
        self.inner.lock().implementations.insert(symbol, locations);
    }

    pub fn set_references(&self, symbol: SymbolHandle, locations: Vec<Location>) {
        self.inner.lock().references.insert(symbol, locations);
    }

    pub fn set_callers(&self, symbol: SymbolHandle, locations: Vec<Location>) {
        self.inner.lock().callers.insert(symbol, locations);
    }

    pub fn set_callees(&self, symbol: SymbolHandle, locations: Vec<Location>) {
        self.inner.lock().callees.insert(symbol, locations);
    }

    pub fn set_descriptor(&self, symbol: SymbolHandle, descriptor: SymbolDescriptor) {
        self.inner.lock().descriptors.insert(symbol, descriptor);
    }

    pub fn set_diagnostics(&self, diagnostics: Vec<Diagnostic>) {
        self.inner.lock().diagnostics = diagnostics;
    }

    /// Every `(file, line, column)` passed to `symbol_at`, in call order.
    pub fn symbol_at_calls(&self) -> Vec<(PathBuf, u32, u32)> {
        self.inner.lock().symbol_at_calls.clone()
    }
}

#[async_trait]
impl AnalyzerAdapter for FakeAnalyzerAdapter {
    type State = ();

    async fn symbol_at(
        &self,
        _state: &(),
        file: &Path,
        line: u32,
        column: u32,
        _cancel: &CancellationToken,
    ) -> Option<SymbolHandle> {
        let mut inner = self.inner.lock();
        inner.symbol_at_calls.push((file.to_path_buf(), line, column));
        inner.symbol_at.get(&(file.to_path_buf(), line, column)).copied()
    }

    async fn definition(
        &self,
        _state: &(),
        symbol: SymbolHandle,
        _cancel: &CancellationToken,
    ) -> Option<DefinitionAnswer> {
        self.inner.lock().definitions.get(&symbol).cloned()
    }

    async fn base_definition(
        &self,
        _state: &(),
        symbol: SymbolHandle,
        _cancel: &CancellationToken,
    ) -> Option<DefinitionAnswer> {
        self.inner.lock().base_definitions.get(&symbol).cloned()
    }

    async fn implementations(&self, _state: &(), symbol: SymbolHandle, _cancel: &CancellationToken) -> Vec<Location> {
        self.inner.lock().implementations.get(&symbol).cloned().unwrap_or_default()
    }

    async fn references(&self, _state: &(), symbol: SymbolHandle, _cancel: &CancellationToken) -> Vec<Location> {
        self.inner.lock().references.get(&symbol).cloned().unwrap_or_default()
    }

    async fn callers(&self, _state: &(), symbol: SymbolHandle, _cancel: &CancellationToken) -> Vec<Location> {
        self.inner.lock().callers.get(&symbol).cloned().unwrap_or_default()
    }

    async fn callees(&self, _state: &(), symbol: SymbolHandle, _cancel: &CancellationToken) -> Vec<Location> {
        self.inner.lock().callees.get(&symbol).cloned().unwrap_or_default()
    }

    async fn describe(&self, _state: &(), symbol: SymbolHandle, _cancel: &CancellationToken) -> SymbolDescriptor {
        self.inner.lock().descriptors.get(&symbol).cloned().unwrap_or(SymbolDescriptor {
            name: String::new(),
            kind: SymbolKind::Other,
            full_name: String::new(),
            signature: None,
            documentation: None,
            containing_type: None,
            containing_namespace: None,
            return_type: None,
            accessibility: None,
            modifiers: Vec::new(),
            location: None,
        })
    }

    async fn diagnostics(&self, _state: &(), _file: Option<&Path>, _cancel: &CancellationToken) -> Vec<Diagnostic> {
        self.inner.lock().diagnostics.clone()
    }
}

#[cfg(test)]
#[path = "test_support_tests.rs"]
mod tests;
