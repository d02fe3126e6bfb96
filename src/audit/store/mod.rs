//! Durable audit stores
//!
//! An [`AuditStore`] is the injected capability the recorder writes to.
//! A missing store is represented by `None` at the recorder level rather
//! than by a global handle.

mod jsonl;
mod sqlite;

pub use jsonl::JsonlStore;
pub use sqlite::SqliteStore;

use crate::config::paths::AuditPaths;
use crate::config::settings::{Settings, StoreBackend};
use crate::error::AuditResult;

use super::entry::{AuditEntry, AuditQuery};

/// Append-only storage for audit entries
pub trait AuditStore: Send + Sync {
    /// Append a single entry
    fn append(&self, entry: &AuditEntry) -> AuditResult<()>;

    /// Read entries matching the query, oldest first
    fn query(&self, query: &AuditQuery) -> AuditResult<Vec<AuditEntry>>;

    /// Total number of stored entries
    fn count(&self) -> AuditResult<usize>;

    /// Short description for diagnostics (backend and location)
    fn describe(&self) -> String;
}

/// Open the store selected in settings
///
/// Returns `Ok(None)` when auditing is disabled.
pub fn open_store(
    settings: &Settings,
    paths: &AuditPaths,
) -> AuditResult<Option<Box<dyn AuditStore>>> {
    match settings.store {
        StoreBackend::None => Ok(None),
        StoreBackend::Jsonl => {
            paths.ensure_directories()?;
            Ok(Some(Box::new(JsonlStore::new(paths.audit_log()))))
        }
        StoreBackend::Sqlite => {
            paths.ensure_directories()?;
            Ok(Some(Box::new(SqliteStore::open(&paths.audit_db())?)))
        }
    }
}
