// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TextIndexAdapter`: a self-contained, regex-based stand-in for the
//! semantic analyzer that §1 places out of scope. It satisfies both
//! [`rq_storage::WorkspaceLoader`] and [`crate::AnalyzerAdapter`] without a
//! real C# front end — good enough to drive the daemon end-to-end and to
//! exercise every query method, but with no type system behind it.
//!
//! Known fixture limitations (no compiler semantics to draw on):
//! - `base_definition`/`implementations` have no inheritance model and
//!   always report "not found"/empty.
//! - `references` reports the same call sites as `callers` — it cannot
//!   distinguish a call from any other textual use of a name.
//! - `diagnostics` is always empty; nothing here type-checks anything.

mod scan;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use rq_core::{Diagnostic, Location, SymbolDescriptor, SymbolKind};
use rq_storage::{DocumentHandle, LoadError, LoadedWorkspace, ProjectHandle, Snapshot, WorkspaceLoader};
use tokio_util::sync::CancellationToken;

use crate::analyzer::{AnalyzerAdapter, SymbolHandle};
use scan::{CallSite, MethodDecl};

/// The opaque per-snapshot state a `TextIndexAdapter` hands back through
/// `rq_storage::Snapshot::analyzer_state` (§3 `analyzer_state`).
pub struct TextIndexState {
    methods: Vec<MethodDecl>,
    calls: Vec<CallSite>,
    by_name: HashMap<String, Vec<usize>>,
}

impl TextIndexState {
    fn build(documents: &HashMap<PathBuf, String>) -> Self {
        let mut methods = Vec::new();
        let mut calls = Vec::new();

        let mut paths: Vec<&PathBuf> = documents.keys().collect();
        paths.sort();

        for path in paths {
            let text = &documents[path];
            let result = scan::scan_file(path, text, methods.len());
            methods.extend(result.methods);
            calls.extend(result.calls);
        }

        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, decl) in methods.iter().enumerate() {
            by_name.entry(decl.name.clone()).or_default().push(idx);
        }

        Self { methods, calls, by_name }
    }

    fn resolve(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).and_then(|indices| indices.first().copied())
    }

    /// Absolute location — rendering it workspace-root-relative is the
    /// dispatcher's job (§4.6), not this adapter's.
    fn location_of(&self, decl: &MethodDecl) -> Location {
        Location::point(decl.file.to_string_lossy().into_owned(), decl.line, decl.column)
    }
}

/// Walks a workspace root for `*.cs` source files and the first
/// `*.csproj`/`*.sln` manifest it finds, skipping the usual build-output
/// directories, and serves as both the `rq_storage::WorkspaceLoader` and
/// the `AnalyzerAdapter` for the resulting `TextIndexState`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextIndexAdapter;

impl TextIndexAdapter {
    pub fn new() -> Self {
        Self
    }

    fn scan_root(&self, root: &Path) -> Result<LoadedWorkspace<TextIndexState>, LoadError> {
        let mut documents = HashMap::new();
        let mut projects = Vec::new();
        walk(root, root, &mut documents, &mut projects)?;
        let state = TextIndexState::build(&documents);

        let documents = documents
            .into_iter()
            .map(|(path, text)| {
                let handle = DocumentHandle { path: path.clone(), text: Arc::from(text.as_str()) };
                (path, handle)
            })
            .collect();

        Ok(LoadedWorkspace { root: root.to_path_buf(), projects, documents, analyzer_state: Arc::new(state) })
    }
}

const SKIP_DIRS: &[&str] = &["bin", "obj", ".git", "node_modules"];

fn walk(
    root: &Path,
    dir: &Path,
    documents: &mut HashMap<PathBuf, String>,
    projects: &mut Vec<ProjectHandle>,
) -> Result<(), LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|e| LoadError::Io(dir.to_path_buf(), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| LoadError::Io(dir.to_path_buf(), e))?;
        let path = entry.path();
        if path.is_dir() {
            if path.file_name().and_then(|n| n.to_str()).is_some_and(|n| SKIP_DIRS.contains(&n)) {
                continue;
            }
            walk(root, &path, documents, projects)?;
            continue;
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some("cs") => {
                let text = std::fs::read_to_string(&path).map_err(|e| LoadError::Io(path.clone(), e))?;
                documents.insert(path, text);
            }
            Some("csproj") | Some("sln") => {
                let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
                projects.push(ProjectHandle { name, path: path.clone() });
            }
            _ => {}
        }
    }
    Ok(())
}

#[async_trait]
impl WorkspaceLoader<TextIndexState> for TextIndexAdapter {
    async fn load_initial(&self, root: &Path) -> Result<LoadedWorkspace<TextIndexState>, LoadError> {
        self.scan_root(root)
    }

    async fn reload(&self, root: &Path) -> Result<LoadedWorkspace<TextIndexState>, LoadError> {
        self.scan_root(root)
    }

    /// Rescans every document's text with `path` replaced by `new_text`.
    /// The fixture index is cheap enough to rebuild wholesale rather than
    /// patch incrementally (an honest simplification, not a claim that a
    /// real analyzer would work this way — see DESIGN.md).
    async fn apply_edit(
        &self,
        current: &Snapshot<TextIndexState>,
        path: &Path,
        new_text: &str,
    ) -> Result<LoadedWorkspace<TextIndexState>, LoadError> {
        let mut documents: HashMap<PathBuf, String> = current
            .documents()
            .iter()
            .map(|(p, handle)| (p.clone(), handle.text.to_string()))
            .collect();
        documents.insert(path.to_path_buf(), new_text.to_string());

        let state = TextIndexState::build(&documents);
        let documents = documents
            .into_iter()
            .map(|(p, text)| (p.clone(), DocumentHandle { path: p, text: Arc::from(text.as_str()) }))
            .collect();

        Ok(LoadedWorkspace {
            root: current.root().to_path_buf(),
            projects: current.projects().to_vec(),
            documents,
            analyzer_state: Arc::new(state),
        })
    }
}

#[async_trait]
impl AnalyzerAdapter for TextIndexAdapter {
    type State = TextIndexState;

    async fn symbol_at(
        &self,
        state: &TextIndexState,
        file: &Path,
        line: u32,
        column: u32,
        _cancel: &CancellationToken,
    ) -> Option<SymbolHandle> {
        if let Some((idx, _)) = state
            .methods
            .iter()
            .enumerate()
            .find(|(_, m)| m.file == file && m.line == line && column_in_name(m, column))
        {
            return Some(SymbolHandle(idx));
        }

        let call = state.calls.iter().find(|c| c.file == file && c.line == line && column_in_call(c, column))?;
        let idx = state.resolve(&call.callee_name)?;
        Some(SymbolHandle(idx))
    }

    async fn definition(
        &self,
        state: &TextIndexState,
        symbol: SymbolHandle,
        _cancel: &CancellationToken,
    ) -> Option<(Location, String, SymbolKind)> {
        let decl = state.methods.get(symbol.0)?;
        Some((state.location_of(decl), decl.name.clone(), SymbolKind::Method))
    }

    async fn base_definition(
        &self,
        _state: &TextIndexState,
        _symbol: SymbolHandle,
        _cancel: &CancellationToken,
    ) -> Option<(Location, String, SymbolKind)> {
        None
    }

    async fn implementations(
        &self,
        _state: &TextIndexState,
        _symbol: SymbolHandle,
        _cancel: &CancellationToken,
    ) -> Vec<Location> {
        Vec::new()
    }

    async fn references(
        &self,
        state: &TextIndexState,
        symbol: SymbolHandle,
        cancel: &CancellationToken,
    ) -> Vec<Location> {
        self.callers(state, symbol, cancel).await
    }

    async fn callers(
        &self,
        state: &TextIndexState,
        symbol: SymbolHandle,
        _cancel: &CancellationToken,
    ) -> Vec<Location> {
        let Some(decl) = state.methods.get(symbol.0) else { return Vec::new() };
        state
            .calls
            .iter()
            .filter(|c| c.callee_name == decl.name)
            .map(|c| Location::point(c.file.to_string_lossy().into_owned(), c.line, c.column))
            .collect()
    }

    async fn callees(
        &self,
        state: &TextIndexState,
        symbol: SymbolHandle,
        _cancel: &CancellationToken,
    ) -> Vec<Location> {
        state
            .calls
            .iter()
            .filter(|c| c.caller_method == Some(symbol.0))
            .filter_map(|c| state.resolve(&c.callee_name))
            .filter_map(|idx| state.methods.get(idx))
            .map(|decl| state.location_of(decl))
            .collect()
    }

    async fn describe(
        &self,
        state: &TextIndexState,
        symbol: SymbolHandle,
        _cancel: &CancellationToken,
    ) -> SymbolDescriptor {
        let Some(decl) = state.methods.get(symbol.0) else {
            return SymbolDescriptor {
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
            };
        };
        let full_name = match &decl.containing_type {
            Some(ty) => format!("{ty}.{}", decl.name),
            None => decl.name.clone(),
        };
        SymbolDescriptor {
            name: decl.name.clone(),
            kind: SymbolKind::Method,
            full_name,
            signature: Some(format!("{} {}(...)", decl.return_type, decl.name)),
            documentation: None,
            containing_type: decl.containing_type.clone(),
            containing_namespace: None,
            return_type: Some(decl.return_type.clone()),
            accessibility: decl.accessibility.as_deref().map(parse_accessibility),
            modifiers: Vec::new(),
            location: Some(state.location_of(decl)),
        }
    }

    async fn diagnostics(
        &self,
        _state: &TextIndexState,
        _file: Option<&Path>,
        _cancel: &CancellationToken,
    ) -> Vec<Diagnostic> {
        Vec::new()
    }
}

fn column_in_name(decl: &MethodDecl, column: u32) -> bool {
    let start = decl.column;
    let end = start + decl.name.len() as u32;
    (start..end).contains(&column)
}

fn column_in_call(call: &CallSite, column: u32) -> bool {
    let start = call.column;
    let end = start + call.callee_name.len() as u32;
    (start..end).contains(&column)
}

use rq_core::Accessibility;

fn parse_accessibility(s: &str) -> Accessibility {
    match s {
        "public" => Accessibility::Public,
        "private" => Accessibility::Private,
        "protected" => Accessibility::Protected,
        "internal" => Accessibility::Internal,
        _ => Accessibility::Private,
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
