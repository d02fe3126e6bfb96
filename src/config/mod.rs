//! Configuration module for folio-audit
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Settings persistence (store backend, unknown-actor sentinel)

pub mod paths;
pub mod settings;

pub use paths::AuditPaths;
pub use settings::{Settings, StoreBackend};
