// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The semantic-analyzer seam (§1, §4.6): "given a loaded workspace snapshot
//! and a position, return a symbol handle and its related symbol sets." This
//! crate never re-implements C# semantics — it only defines the interface
//! the dispatcher drives, and ships one concrete, self-contained
//! implementation (`TextIndexAdapter`) that satisfies it without a real
//! compiler front-end.

use std::path::Path;

use async_trait::async_trait;
use rq_core::{Diagnostic, SymbolDescriptor};
use tokio_util::sync::CancellationToken;

/// An opaque handle to a resolved symbol, valid only against the `State`
/// it was resolved from. Callers never inspect its contents (§3 Symbol).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolHandle(pub usize);

/// Resolves positions to symbols and symbols to their related symbol sets,
/// against one analyzer-state type per adapter (§3 `analyzer_state`).
#[async_trait]
pub trait AnalyzerAdapter: Send + Sync {
    type State: Send + Sync + 'static;

    /// No symbol at `(file, line, column)` → `None` (§4.6 `symbol_not_found`).
    async fn symbol_at(
        &self,
        state: &Self::State,
        file: &Path,
        line: u32,
        column: u32,
        cancel: &CancellationToken,
    ) -> Option<SymbolHandle>;

    /// `definition`/`base-definition` target: `None` when no definition
    /// site exists (e.g. `base-definition` with no base, §4.6).
    async fn definition(
        &self,
        state: &Self::State,
        symbol: SymbolHandle,
        cancel: &CancellationToken,
    ) -> Option<(rq_core::Location, String, rq_core::SymbolKind)>;

    /// The overridden or interface-declared symbol, if any (§4.6 `base-definition`).
    async fn base_definition(
        &self,
        state: &Self::State,
        symbol: SymbolHandle,
        cancel: &CancellationToken,
    ) -> Option<(rq_core::Location, String, rq_core::SymbolKind)>;

    async fn implementations(
        &self,
        state: &Self::State,
        symbol: SymbolHandle,
        cancel: &CancellationToken,
    ) -> Vec<rq_core::Location>;

    async fn references(
        &self,
        state: &Self::State,
        symbol: SymbolHandle,
        cancel: &CancellationToken,
    ) -> Vec<rq_core::Location>;

    async fn callers(
        &self,
        state: &Self::State,
        symbol: SymbolHandle,
        cancel: &CancellationToken,
    ) -> Vec<rq_core::Location>;

    /// Unordered by contract; the dispatcher deduplicates preserving
    /// first-occurrence order (§4.6 `callees`).
    async fn callees(
        &self,
        state: &Self::State,
        symbol: SymbolHandle,
        cancel: &CancellationToken,
    ) -> Vec<rq_core::Location>;

    async fn describe(
        &self,
        state: &Self::State,
        symbol: SymbolHandle,
        cancel: &CancellationToken,
    ) -> SymbolDescriptor;

    /// Compiler diagnostics for `file`, or the whole workspace when `None`.
    async fn diagnostics(
        &self,
        state: &Self::State,
        file: Option<&Path>,
        cancel: &CancellationToken,
    ) -> Vec<Diagnostic>;
}
