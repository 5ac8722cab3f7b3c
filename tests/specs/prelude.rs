//! Shared end-to-end harness (§8): spins up a real workspace directory and
//! drives the actual `rq`/`rqd` binaries against it, rather than exercising
//! any crate's internals directly.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use assert_cmd::Command;
use rq_core::{canonicalize_workspace, pid_path, socket_path, WorkspaceKey};
use rq_wire::{read_frame, write_frame, Request, Response};
use tempfile::TempDir;
use tokio::net::UnixStream;

/// A method `M` declared once and called twice from a sibling method.
///
/// Laid out one statement per line deliberately: `TextIndexAdapter`'s
/// `method_re` anchors at the start of a line and, on a matching line,
/// `scan_file` never scans that same line for call sites — so a call on the
/// same physical line as its enclosing method's own declaration would be
/// silently dropped. Declaration column of `M` is 21 (line 5); the two call
/// sites sit on their own lines (8 and 9), both at column 13.
pub const DEFINITION_FIXTURE: &str = "namespace N\n\
{\n\
    class C\n\
    {\n\
        public void M() { }\n\
        public void X()\n\
        {\n\
            M();\n\
            M();\n\
        }\n\
    }\n\
}\n";

pub const DEFINITION_FILE: &str = "T.cs";
pub const DEFINITION_DECL_LINE: u32 = 5;
pub const DEFINITION_DECL_COLUMN: u32 = 21;
pub const DEFINITION_CALL_1_LINE: u32 = 8;
pub const DEFINITION_CALL_1_COLUMN: u32 = 13;
pub const DEFINITION_CALL_2_LINE: u32 = 9;
pub const DEFINITION_CALL_2_COLUMN: u32 = 13;

/// A throwaway workspace directory plus an isolated runtime directory, so
/// this test's socket/PID files never collide with another test's.
pub struct Workspace {
    source: TempDir,
    runtime: TempDir,
}

impl Workspace {
    pub fn empty() -> Self {
        Self { source: TempDir::new().expect("create workspace tempdir"), runtime: TempDir::new().expect("create runtime tempdir") }
    }

    /// A workspace seeded with [`DEFINITION_FIXTURE`] and a project manifest.
    pub fn single_file() -> Self {
        let ws = Self::empty();
        ws.file(DEFINITION_FILE, DEFINITION_FIXTURE);
        ws.file("proj.csproj", "<Project Sdk=\"Microsoft.NET.Sdk\"></Project>\n");
        ws
    }

    pub fn path(&self) -> &Path {
        self.source.path()
    }

    pub fn file(&self, relative: &str, contents: &str) {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create fixture parent directory");
        }
        std::fs::write(path, contents).expect("write fixture file");
    }

    fn canonical_root(&self) -> PathBuf {
        canonicalize_workspace(self.path()).expect("canonicalize workspace root")
    }

    fn key(&self) -> WorkspaceKey {
        WorkspaceKey::from_canonical_path(&self.canonical_root())
    }

    /// Run `f` with `XDG_RUNTIME_DIR` pointed at this workspace's isolated
    /// runtime directory, restoring the previous value afterward. Callers
    /// must hold `#[serial]` — this mutates process-global state.
    fn with_runtime_env<T>(&self, f: impl FnOnce() -> T) -> T {
        let previous = std::env::var_os("XDG_RUNTIME_DIR");
        std::env::set_var("XDG_RUNTIME_DIR", self.runtime.path());
        let result = f();
        match previous {
            Some(value) => std::env::set_var("XDG_RUNTIME_DIR", value),
            None => std::env::remove_var("XDG_RUNTIME_DIR"),
        }
        result
    }

    pub fn socket_path(&self) -> PathBuf {
        let key = self.key();
        self.with_runtime_env(|| socket_path(key).expect("derive socket path"))
    }

    pub fn pid_path(&self) -> PathBuf {
        let key = self.key();
        self.with_runtime_env(|| pid_path(key).expect("derive pid path"))
    }

    /// An `assert_cmd::Command` for the `rq` binary, wired to this
    /// workspace's directory and isolated runtime directory.
    pub fn rq(&self) -> Command {
        let mut cmd = Command::cargo_bin("rq").expect("locate rq binary");
        cmd.env("XDG_RUNTIME_DIR", self.runtime.path());
        cmd.env("RQ_LOG_DIR", self.runtime.path());
        cmd.arg("--workspace").arg(self.path());
        cmd
    }

    /// Spawn `rqd` directly, bypassing the `rq` launcher, for scenarios that
    /// need to observe the daemon process (or its exit) rather than a
    /// client's interpretation of it.
    pub fn spawn_daemon(&self, idle_timeout_minutes: Option<u32>) -> std::process::Child {
        let binary = assert_cmd::cargo::cargo_bin("rqd");
        let mut command = std::process::Command::new(binary);
        command.arg(self.path());
        if let Some(minutes) = idle_timeout_minutes {
            command.arg("--idle-timeout").arg(minutes.to_string());
        }
        command.env("XDG_RUNTIME_DIR", self.runtime.path());
        command.env("RQ_LOG_DIR", self.runtime.path());
        command.stdin(std::process::Stdio::null());
        command.stdout(std::process::Stdio::null());
        command.stderr(std::process::Stdio::null());
        command.spawn().expect("spawn rqd")
    }
}

/// Poll `predicate` every 50ms until it returns `true` or `max_ms` elapses.
/// Returns whether it succeeded.
pub fn wait_for(max_ms: u64, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if predicate() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

/// Connect directly to a daemon's socket, bypassing the `rq` launcher — for
/// scenarios that need raw control over the wire exchange (S5, S6).
pub async fn connect(socket: &Path) -> UnixStream {
    UnixStream::connect(socket).await.expect("connect to daemon socket")
}

pub async fn request(stream: &mut UnixStream, id: &str, method: &str, params: serde_json::Value) -> Response {
    let req = Request::new(id, method, params);
    let bytes = serde_json::to_vec(&req).expect("encode request");
    write_frame(stream, &bytes).await.expect("write request frame");
    let payload = read_frame(stream)
        .await
        .expect("read response frame")
        .expect("connection closed before a response arrived");
    serde_json::from_slice(&payload).expect("decode response")
}
