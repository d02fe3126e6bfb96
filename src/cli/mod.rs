//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the audit library.

pub mod diff;
pub mod log;
pub mod record;

pub use diff::{handle_diff_command, DiffArgs};
pub use log::{handle_log_command, LogArgs};
pub use record::{handle_record_command, RecordArgs};

use std::path::Path;

use serde_json::Value;

use crate::audit::normalize_value;
use crate::error::{AuditError, AuditResult};

/// Read a snapshot argument: a JSON file, or `-` for "did not exist"
pub(crate) fn read_snapshot(arg: Option<&Path>) -> AuditResult<Option<Value>> {
    let path = match arg {
        Some(path) if path != Path::new("-") => path,
        _ => return Ok(None),
    };

    let contents = std::fs::read_to_string(path)
        .map_err(|e| AuditError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| AuditError::Json(format!("Failed to parse {}: {}", path.display(), e)))?;

    Ok(normalize_value(value))
}
