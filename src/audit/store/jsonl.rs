//! Append-only JSONL audit store
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::audit::entry::{AuditEntry, AuditQuery};
use crate::error::{AuditError, AuditResult};

use super::AuditStore;

/// Writes audit entries to a line-delimited JSON file
///
/// The file is opened in append mode for every write, so several handles
/// pointing at the same path can coexist.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    log_path: PathBuf,
}

impl JsonlStore {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Append several entries, flushing once at the end
    pub fn append_batch(&self, entries: &[AuditEntry]) -> AuditResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut file = self.open_for_append()?;

        let mut buffer = String::new();
        for entry in entries {
            buffer.push_str(&encode_line(entry)?);
        }

        file.write_all(buffer.as_bytes())
            .map_err(|e| AuditError::Io(format!("Failed to write audit entries: {}", e)))?;

        file.flush()
            .map_err(|e| AuditError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read every entry in chronological order (oldest first)
    pub fn read_all(&self) -> AuditResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AuditError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                AuditError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                AuditError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    fn open_for_append(&self) -> AuditResult<File> {
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AuditError::Io(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| AuditError::Io(format!("Failed to open audit log: {}", e)))
    }
}

fn encode_line(entry: &AuditEntry) -> AuditResult<String> {
    let mut line = serde_json::to_string(entry)
        .map_err(|e| AuditError::Json(format!("Failed to serialize audit entry: {}", e)))?;
    line.push('\n');
    Ok(line)
}

impl AuditStore for JsonlStore {
    fn append(&self, entry: &AuditEntry) -> AuditResult<()> {
        let line = encode_line(entry)?;
        let mut file = self.open_for_append()?;

        // One write per line so concurrent appenders never interleave
        file.write_all(line.as_bytes())
            .map_err(|e| AuditError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .map_err(|e| AuditError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    fn query(&self, query: &AuditQuery) -> AuditResult<Vec<AuditEntry>> {
        Ok(query.apply(self.read_all()?))
    }

    fn count(&self) -> AuditResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AuditError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut count = 0;
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                AuditError::Io(format!("Failed to read line {}: {}", line_num + 1, e))
            })?;
            if !line.trim().is_empty() {
                count += 1;
            }
        }

        Ok(count)
    }

    fn describe(&self) -> String {
        format!("jsonl:{}", self.log_path.display())
    }
}
