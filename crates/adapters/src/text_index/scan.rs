// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lexical scanner behind [`super::TextIndexAdapter`]: a regex pass over
//! C# source text that finds method declarations and call-expression sites.
//! This has no type system and no parse tree — it is a fixture analyzer,
//! not a compiler front end.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

static CLASS_RE: OnceLock<Regex> = OnceLock::new();
static METHOD_RE: OnceLock<Regex> = OnceLock::new();
static CALL_RE: OnceLock<Regex> = OnceLock::new();

fn class_re() -> &'static Regex {
    CLASS_RE.get_or_init(|| {
        Regex::new(r"\b(?:class|interface|struct)\s+(?P<name>[A-Za-z_]\w*)").unwrap()
    })
}

fn method_re() -> &'static Regex {
    METHOD_RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            ^\s*
            (?:(?P<access>public|private|protected|internal)\s+)?
            (?:(?:static|virtual|override|abstract|sealed|async|readonly)\s+)*
            (?P<ret>[\w<>\[\],\.\?]+)\s+
            (?P<name>[A-Za-z_]\w*)
            \s*\(([^)]*)\)\s*
            (?:\{|=>|$)
            ",
        )
        .unwrap()
    })
}

fn call_re() -> &'static Regex {
    CALL_RE.get_or_init(|| Regex::new(r"(?P<name>[A-Za-z_]\w*)\s*\(").unwrap())
}

/// Control-flow keywords that look like calls (`if (`, `for (`, ...) but
/// never name a method.
const KEYWORDS: &[&str] = &[
    "if", "for", "foreach", "while", "switch", "catch", "using", "lock", "return", "new", "sizeof",
    "typeof", "nameof", "default",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub file: PathBuf,
    pub line: u32,
    /// 1-based column of the method name within its declaration line.
    pub column: u32,
    pub name: String,
    pub return_type: String,
    pub containing_type: Option<String>,
    pub accessibility: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub file: PathBuf,
    pub line: u32,
    pub column: u32,
    pub callee_name: String,
    /// Index into the owning [`super::TextIndexState::methods`] for the
    /// method this call textually appears inside, if any.
    pub caller_method: Option<usize>,
}

pub struct ScanResult {
    pub methods: Vec<MethodDecl>,
    pub calls: Vec<CallSite>,
}

/// Scan one file's source text for method declarations and call sites.
///
/// `caller_method_base` is the index `methods[0]` will occupy in the
/// caller's combined `Vec` — callers of this function own stitching
/// per-file results into one flat index space.
pub fn scan_file(path: &Path, text: &str, caller_method_base: usize) -> ScanResult {
    let mut methods = Vec::new();
    let mut calls = Vec::new();
    let mut current_class: Option<String> = None;
    let mut current_method: Option<usize> = None;

    for (line_idx, line) in text.lines().enumerate() {
        let line_no = (line_idx + 1) as u32;

        if let Some(caps) = class_re().captures(line) {
            current_class = Some(caps["name"].to_string());
        }

        if let Some(caps) = method_re().captures(line) {
            let name_match = caps.name("name").unwrap();
            let decl = MethodDecl {
                file: path.to_path_buf(),
                line: line_no,
                column: (name_match.start() + 1) as u32,
                name: name_match.as_str().to_string(),
                return_type: caps["ret"].to_string(),
                containing_type: current_class.clone(),
                accessibility: caps.name("access").map(|m| m.as_str().to_string()),
            };
            methods.push(decl);
            current_method = Some(caller_method_base + methods.len() - 1);
            continue;
        }

        for caps in call_re().captures_iter(line) {
            let name_match = caps.name("name").unwrap();
            let name = name_match.as_str();
            if KEYWORDS.contains(&name) {
                continue;
            }
            calls.push(CallSite {
                file: path.to_path_buf(),
                line: line_no,
                column: (name_match.start() + 1) as u32,
                callee_name: name.to_string(),
                caller_method: current_method,
            });
        }
    }

    ScanResult { methods, calls }
}

#[cfg(test)]
#[path = "scan_tests.rs"]
mod tests;
