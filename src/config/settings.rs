//! User settings for folio-audit
//!
//! Selects the audit store backend and controls how entries are rendered.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::paths::AuditPaths;
use crate::audit::{DEFAULT_SUMMARY_MAX_LEN, UNKNOWN_ACTOR};
use crate::error::AuditError;

/// Where audit entries are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Auditing disabled; the recorder skips every entry
    None,
    /// Append-only JSON lines file (default)
    #[default]
    Jsonl,
    /// SQLite database with an `audit_log` table
    Sqlite,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::None => write!(f, "none"),
            StoreBackend::Jsonl => write!(f, "jsonl"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for StoreBackend {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(StoreBackend::None),
            "jsonl" | "file" => Ok(StoreBackend::Jsonl),
            "sqlite" | "db" => Ok(StoreBackend::Sqlite),
            other => Err(AuditError::Config(format!("unknown store backend '{}'", other))),
        }
    }
}

/// User settings for folio-audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Audit store backend
    #[serde(default)]
    pub store: StoreBackend,

    /// Actor recorded when a mutation has no identified user
    #[serde(default = "default_unknown_actor")]
    pub unknown_actor: String,

    /// Truncation length for strings in change summaries
    #[serde(default = "default_summary_max_len")]
    pub summary_max_len: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_unknown_actor() -> String {
    UNKNOWN_ACTOR.to_string()
}

fn default_summary_max_len() -> usize {
    DEFAULT_SUMMARY_MAX_LEN
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            store: StoreBackend::default(),
            unknown_actor: default_unknown_actor(),
            summary_max_len: default_summary_max_len(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &AuditPaths) -> Result<Self, AuditError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| AuditError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents)
                .map_err(|e| AuditError::Config(format!("Failed to parse settings file: {}", e)))?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AuditPaths) -> Result<(), AuditError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| AuditError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| AuditError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.store, StoreBackend::Jsonl);
        assert_eq!(settings.unknown_actor, "unknown");
        assert_eq!(settings.summary_max_len, 50);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AuditPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            store: StoreBackend::Sqlite,
            unknown_actor: "anonymous".into(),
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.store, StoreBackend::Sqlite);
        assert_eq!(loaded.unknown_actor, "anonymous");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"store": "none"}"#).unwrap();
        assert_eq!(settings.store, StoreBackend::None);
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.unknown_actor, "unknown");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AuditPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("SQLite".parse::<StoreBackend>().unwrap(), StoreBackend::Sqlite);
        assert_eq!("off".parse::<StoreBackend>().unwrap(), StoreBackend::None);
        assert!("redis".parse::<StoreBackend>().is_err());
    }
}
