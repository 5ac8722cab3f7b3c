// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete implementations of the external seams §1 carves out: the
//! analyzer/project-loader (§4.5, §4.6) and the filesystem watcher (§4.4).

mod analyzer;
mod text_index;
mod watcher;

pub use analyzer::{AnalyzerAdapter, SymbolHandle};
pub use text_index::{TextIndexAdapter, TextIndexState};
pub use watcher::{DebouncedWatcher, WatchBatch, WatchError};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
