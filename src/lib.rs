//! folio-audit - field-level audit trail for the portfolio admin back office
//!
//! Admin mutation handlers (posts, experiences, work samples, apps, tools,
//! skills, promos, site settings) pass the entity before and after their
//! write; this crate computes which fields changed and appends an immutable
//! audit entry. Auditing is best-effort: it never fails the mutation it
//! describes.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `audit`: snapshot normalization, diffing, entries, stores, recorder
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `cli`: Command handlers for the `folio-audit` binary
//!
//! # Example
//!
//! ```rust
//! use folio_audit::audit::build_diff;
//! use serde_json::json;
//!
//! let before = json!({"title": "A", "views": 1});
//! let after = json!({"title": "A", "views": 2});
//!
//! let diff = build_diff(Some(&before), Some(&after));
//! assert_eq!(diff.changed_fields(), vec!["views"]);
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;

pub use error::{AuditError, AuditResult};
