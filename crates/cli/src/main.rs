// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rq`: the client front-end (§1 "out of scope": argument parsing, output
//! formatting, and exit-code selection are this crate's own choices, not
//! dictated by the wire contract).
//!
//! Grounded in the corpus's CLI shape (`clap` derive, `color`-module styled
//! help, `ExitError` carrying a process exit code back to `main`) with the
//! command surface itself rebuilt against the query dispatcher's methods
//! (§4.6) rather than the corpus's job/agent commands.

mod client;
mod color;
mod exit_error;
mod launcher;

use std::path::PathBuf;

use clap::{Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use exit_error::ExitError;
use rq_core::DaemonStatus;
use rq_wire::ResponsePayload;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "rq", version, about = "Query a running roslyn-query daemon")]
struct Cli {
    /// Workspace root to query (defaults to the current directory).
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Idle-timeout in minutes passed to a freshly spawned daemon.
    #[arg(long, global = true)]
    idle_timeout: Option<u32>,

    /// Emit machine-readable JSON instead of formatted text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Jump to a symbol's definition.
    Definition(PositionArgs),
    /// Jump to the symbol a method overrides or an interface declares.
    BaseDefinition(PositionArgs),
    /// List implementations of an interface or abstract member.
    Implementations(PositionArgs),
    /// List references to a symbol.
    References(ReferencesArgs),
    /// List call sites of a method.
    Callers(PositionArgs),
    /// List methods called from within a method.
    Callees(PositionArgs),
    /// Describe the symbol at a position.
    Symbol(PositionArgs),
    /// List compiler diagnostics.
    Diagnostics(DiagnosticsArgs),
    /// Check that the daemon is alive and report its idle state.
    Ping,
    /// Report whether a daemon is running for this workspace, without
    /// spawning one.
    Status,
    /// Ask the daemon to shut down gracefully.
    Shutdown,
}

#[derive(Args)]
struct PositionArgs {
    /// Source file, absolute or workspace-root-relative.
    file: String,
    /// 1-based line number.
    line: u32,
    /// 1-based column number.
    column: u32,
}

#[derive(Args)]
struct ReferencesArgs {
    file: String,
    line: u32,
    column: u32,
    /// Include the symbol's own definition in the results.
    #[arg(long)]
    include_definition: bool,
}

#[derive(Args)]
struct DiagnosticsArgs {
    /// Limit to one file; omit for workspace-wide diagnostics.
    #[arg(long)]
    file: Option<String>,
    /// Include warning-severity diagnostics.
    #[arg(long, default_value_t = true)]
    include_warnings: bool,
    /// Include info-severity diagnostics.
    #[arg(long)]
    include_info: bool,
}

#[tokio::main]
async fn main() {
    let cli = match parse_cli() {
        Ok(cli) => cli,
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            std::process::exit(if code == 0 { 0 } else { 3 });
        }
    };

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            err.code
        }
    };
    std::process::exit(code);
}

fn parse_cli() -> Result<Cli, clap::Error> {
    let command = Cli::command().styles(color::styles());
    let matches = command.try_get_matches()?;
    Cli::from_arg_matches(&matches)
}

async fn run(cli: Cli) -> Result<i32, ExitError> {
    let workspace = cli.workspace.clone().unwrap_or_else(|| PathBuf::from("."));

    if matches!(cli.command, Command::Status) {
        return status_command(&workspace, cli.json).await;
    }

    let launched = launcher::launch(&workspace, cli.idle_timeout).await.map_err(launch_exit_error)?;
    let (method, params) = build_request(&cli.command);
    let response = launched
        .client
        .request(method, params)
        .await
        .map_err(|e| ExitError::new(4, format!("daemon connection failure: {e}")))?;

    render_response(method, &response, cli.json)
}

async fn status_command(workspace: &std::path::Path, json: bool) -> Result<i32, ExitError> {
    let status = launcher::probe_status(workspace).await.map_err(launch_exit_error)?;
    if json {
        println!("{}", serde_json::to_string(&status).unwrap_or_default());
    } else {
        print_status(&status);
    }
    Ok(0)
}

fn launch_exit_error(e: launcher::LaunchError) -> ExitError {
    use launcher::LaunchError;
    match e {
        LaunchError::Workspace(..) | LaunchError::Path(_) => ExitError::new(3, e.to_string()),
        LaunchError::WorkspaceLoad(_) => ExitError::new(2, e.to_string()),
        LaunchError::Spawn(_) | LaunchError::DaemonError(_) | LaunchError::Timeout(_) => {
            ExitError::new(4, e.to_string())
        }
    }
}

fn build_request(command: &Command) -> (&'static str, Value) {
    match command {
        Command::Definition(p) => ("definition", position_params(p)),
        Command::BaseDefinition(p) => ("base-definition", position_params(p)),
        Command::Implementations(p) => ("implementations", position_params(p)),
        Command::References(r) => (
            "references",
            serde_json::json!({
                "file": r.file,
                "line": r.line,
                "column": r.column,
                "include_definition": r.include_definition,
            }),
        ),
        Command::Callers(p) => ("callers", position_params(p)),
        Command::Callees(p) => ("callees", position_params(p)),
        Command::Symbol(p) => ("symbol", position_params(p)),
        Command::Diagnostics(d) => (
            "diagnostics",
            serde_json::json!({
                "file": d.file,
                "include_warnings": d.include_warnings,
                "include_info": d.include_info,
            }),
        ),
        Command::Ping => ("ping", Value::Null),
        Command::Shutdown => ("shutdown", Value::Null),
        Command::Status => unreachable!("status is handled before a connection is made"),
    }
}

fn position_params(p: &PositionArgs) -> Value {
    serde_json::json!({"file": p.file, "line": p.line, "column": p.column})
}

fn render_response(method: &str, response: &rq_wire::Response, json: bool) -> Result<i32, ExitError> {
    match &response.payload {
        ResponsePayload::Error { error } => {
            Err(ExitError::new(4, format!("daemon reported a protocol error ({}): {}", error.code, error.message)))
        }
        ResponsePayload::Result { result } => {
            if json {
                println!("{result}");
            } else {
                print_result(method, result);
            }
            Ok(if envelope_success(result) { 0 } else { 1 })
        }
    }
}

fn envelope_success(result: &Value) -> bool {
    result.get("success").and_then(Value::as_bool).unwrap_or(true)
}

fn print_result(method: &str, result: &Value) {
    match method {
        "definition" | "base-definition" => print_definition(result),
        "implementations" | "references" | "callers" | "callees" => print_locations(result),
        "symbol" => print_symbol(result),
        "diagnostics" => print_diagnostics(result),
        "ping" => print_ping(result),
        "shutdown" => println!("{}", color::header("shutting down")),
        _ => println!("{result}"),
    }
}

fn no_result_message(result: &Value) -> String {
    let code = result.get("error_code").and_then(Value::as_str).unwrap_or("no_result");
    format!("no result: {code}")
}

fn print_definition(result: &Value) {
    if !envelope_success(result) {
        println!("{}", no_result_message(result));
        return;
    }
    let name = result.get("symbol_name").and_then(Value::as_str).unwrap_or("?");
    let kind = result.get("symbol_kind").and_then(Value::as_str).unwrap_or("?");
    if let Some(loc) = result.get("location") {
        println!(
            "{} {}:{}:{} ({})",
            color::header(name),
            loc.get("file").and_then(Value::as_str).unwrap_or("?"),
            loc.get("line").and_then(Value::as_u64).unwrap_or(0),
            loc.get("column").and_then(Value::as_u64).unwrap_or(0),
            color::literal(kind),
        );
    }
}

fn print_locations(result: &Value) {
    if !envelope_success(result) {
        println!("{}", no_result_message(result));
        return;
    }
    let name = result.get("symbol_name").and_then(Value::as_str).unwrap_or("?");
    println!("{}", color::header(name));
    for loc in result.get("locations").and_then(Value::as_array).into_iter().flatten() {
        println!(
            "  {}:{}:{}",
            loc.get("file").and_then(Value::as_str).unwrap_or("?"),
            loc.get("line").and_then(Value::as_u64).unwrap_or(0),
            loc.get("column").and_then(Value::as_u64).unwrap_or(0),
        );
    }
}

fn print_symbol(result: &Value) {
    if !envelope_success(result) {
        println!("{}", no_result_message(result));
        return;
    }
    let name = result.get("name").and_then(Value::as_str).unwrap_or("?");
    let kind = result.get("kind").and_then(Value::as_str).unwrap_or("?");
    println!("{} ({})", color::header(name), color::literal(kind));
    if let Some(sig) = result.get("signature").and_then(Value::as_str) {
        println!("  {sig}");
    }
}

fn print_diagnostics(result: &Value) {
    let error_count = result.get("error_count").and_then(Value::as_u64).unwrap_or(0);
    let warning_count = result.get("warning_count").and_then(Value::as_u64).unwrap_or(0);
    let info_count = result.get("info_count").and_then(Value::as_u64).unwrap_or(0);
    println!("{error_count} error(s), {warning_count} warning(s), {info_count} info");
    for d in result.get("diagnostics").and_then(Value::as_array).into_iter().flatten() {
        let severity = d.get("severity").and_then(Value::as_str).unwrap_or("?");
        let message = d.get("message").and_then(Value::as_str).unwrap_or("");
        println!("  [{severity}] {message}");
    }
}

fn print_ping(result: &Value) {
    let status = result.get("status").and_then(Value::as_str).unwrap_or("?");
    let idle = result.get("idle_seconds").and_then(Value::as_u64).unwrap_or(0);
    println!("{} (idle {idle}s)", color::header(status));
}

fn print_status(status: &DaemonStatus) {
    println!("{} {}", color::header("workspace"), status.workspace.display());
    println!("{} {}", color::header("running"), status.running);
    println!("{} {}", color::header("responsive"), status.responsive);
    if let Some(pid) = status.pid {
        println!("{} {}", color::header("pid"), pid);
    }
    if let Some(idle) = status.idle_seconds {
        println!("{} {}s", color::header("idle"), idle);
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
