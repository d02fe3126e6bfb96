//! Audit trail for site content mutations
//!
//! Every admin mutation (posts, experiences, work samples, apps, tools,
//! skills, promos, site settings) appends one immutable entry holding the
//! whole before/after snapshots and the fields that changed.
//!
//! # Architecture
//!
//! - `snapshot`: normalizes any serializable value into plain JSON, folding
//!   anything unrepresentable to "absent".
//! - `diff`: `build_diff` computes an `AuditDiff` between two snapshots.
//! - `entry`: `AuditEntry` and the `Action`/`EntityType` vocabulary.
//! - `store`: the `AuditStore` trait with JSONL and SQLite backends.
//! - `recorder`: `AuditRecorder`, the best-effort writer handlers call.
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_audit::audit::{AuditRecorder, EntityType, JsonlStore};
//!
//! let recorder = AuditRecorder::new(Box::new(JsonlStore::new(audit_log_path)));
//!
//! // After the handler has saved `updated` over `existing`
//! recorder.record_change(
//!     session.email.as_deref(),
//!     EntityType::Post,
//!     post.id,
//!     Some(&existing),
//!     Some(&updated),
//! );
//! ```

mod diff;
mod entry;
mod recorder;
mod snapshot;
pub mod store;

pub use diff::{
    build_diff, diff_snapshots, values_equal, AuditDiff, FieldChange, DEFAULT_SUMMARY_MAX_LEN,
};
pub use entry::{Action, AuditEntry, AuditQuery, EntityType};
pub use recorder::{AuditRecord, AuditRecorder, RecordOutcome, UNKNOWN_ACTOR};
pub use snapshot::{normalize, normalize_value};
pub use store::{open_store, AuditStore, JsonlStore, SqliteStore};
