//! Observability: tracing init and the JSONL audit log.
//!
//! Uses config::ObservabilityConfig for VENVBOOT_QUIET, LOG_LEVEL, LOG_JSON, AUDIT_LOG.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

use chrono::Utc;
use serde_json::json;
use tracing_subscriber::{prelude::*, EnvFilter};

static AUDIT_PATH: OnceLock<Option<String>> = OnceLock::new();
static RUN_ID: OnceLock<String> = OnceLock::new();

/// Initialize tracing. Call once at process startup, after `.env` is loaded.
/// Logs go to stderr; stdout is reserved for user-facing notices.
/// When VENVBOOT_QUIET=1 only WARN and above are logged.
pub fn init_tracing() {
    let cfg = crate::config::ObservabilityConfig::from_env();
    let level = if cfg.quiet {
        "venvboot=warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

/// Identifier shared by every audit record of this process.
pub fn run_id() -> &'static str {
    RUN_ID.get_or_init(|| uuid::Uuid::new_v4().to_string())
}

fn get_audit_path() -> Option<&'static str> {
    AUDIT_PATH
        .get_or_init(|| {
            let path = crate::config::ObservabilityConfig::from_env()
                .audit_log
                .clone()?;
            if let Some(parent) = Path::new(&path).parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            Some(path)
        })
        .as_deref()
}

/// Append one JSON record as a line. Audit failures never fail the run.
pub fn append_jsonl(path: &Path, record: &serde_json::Value) {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(mut f) => {
            if let Ok(line) = serde_json::to_string(record) {
                let _ = writeln!(f, "{}", line);
            }
        }
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Cannot open audit log"),
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn step_started_record(step: &str, cmd: &str, args: &[String], cwd: &str) -> serde_json::Value {
    json!({
        "ts": now(),
        "event": "step_started",
        "run_id": run_id(),
        "step": step,
        "cmd": cmd,
        "args": args,
        "cwd": cwd,
    })
}

pub fn step_completed_record(step: &str, exit_code: i32, duration_ms: u64) -> serde_json::Value {
    json!({
        "ts": now(),
        "event": "step_completed",
        "run_id": run_id(),
        "step": step,
        "exit_code": exit_code,
        "duration_ms": duration_ms,
        "success": exit_code == 0,
    })
}

pub fn run_finished_record(exit_code: i32, installed: bool) -> serde_json::Value {
    json!({
        "ts": now(),
        "event": "run_finished",
        "run_id": run_id(),
        "exit_code": exit_code,
        "installed": installed,
    })
}

/// Audit: step_started (right before spawn)
pub fn audit_step_started(step: &str, cmd: &str, args: &[String], cwd: &str) {
    if let Some(path) = get_audit_path() {
        append_jsonl(Path::new(path), &step_started_record(step, cmd, args, cwd));
    }
}

/// Audit: step_completed
pub fn audit_step_completed(step: &str, exit_code: i32, duration_ms: u64) {
    if let Some(path) = get_audit_path() {
        append_jsonl(Path::new(path), &step_completed_record(step, exit_code, duration_ms));
    }
}

/// Audit: run_finished
pub fn audit_run_finished(exit_code: i32, installed: bool) {
    if let Some(path) = get_audit_path() {
        append_jsonl(Path::new(path), &run_finished_record(exit_code, installed));
    }
}
