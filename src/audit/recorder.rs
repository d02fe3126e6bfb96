//! Best-effort audit recorder
//!
//! Mutation handlers call the recorder after their own write succeeded.
//! Recording never fails the caller: a missing store or a failed write is
//! logged and reported through [`RecordOutcome`] only.

use serde::Serialize;
use uuid::Uuid;

use super::diff::{build_diff, AuditDiff};
use super::entry::{Action, AuditEntry, EntityType};
use super::store::AuditStore;

/// Actor recorded when the caller could not identify the user
pub const UNKNOWN_ACTOR: &str = "unknown";

/// Input to [`AuditRecorder::record`]
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub actor_identity: Option<String>,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: Action,
    pub diff: AuditDiff,
}

impl AuditRecord {
    /// `entity_id` accepts anything displayable (numeric ids, uuids, slugs)
    pub fn new(
        actor_identity: Option<String>,
        entity_type: EntityType,
        entity_id: impl ToString,
        action: Action,
        diff: AuditDiff,
    ) -> Self {
        Self {
            actor_identity,
            entity_type,
            entity_id: entity_id.to_string(),
            action,
            diff,
        }
    }
}

/// What the recorder did with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The entry was appended to the store
    Recorded(Uuid),
    /// No store is configured, nothing was written
    Skipped,
    /// The store rejected the write
    Failed,
}

impl RecordOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, RecordOutcome::Recorded(_))
    }
}

/// Writes audit entries to an optional store
pub struct AuditRecorder {
    store: Option<Box<dyn AuditStore>>,
    unknown_actor: String,
}

impl AuditRecorder {
    pub fn new(store: Box<dyn AuditStore>) -> Self {
        Self::from_store(Some(store))
    }

    /// A recorder with no durable store; every record is skipped
    pub fn unconfigured() -> Self {
        Self::from_store(None)
    }

    pub fn from_store(store: Option<Box<dyn AuditStore>>) -> Self {
        Self {
            store,
            unknown_actor: UNKNOWN_ACTOR.to_string(),
        }
    }

    /// Override the sentinel stored for unidentified actors
    pub fn with_unknown_actor(mut self, sentinel: impl Into<String>) -> Self {
        self.unknown_actor = sentinel.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Option<&dyn AuditStore> {
        self.store.as_deref()
    }

    /// Append one entry for a mutation
    pub fn record(&self, record: AuditRecord) -> RecordOutcome {
        let Some(store) = self.store.as_deref() else {
            tracing::warn!(
                entity_type = %record.entity_type,
                entity_id = %record.entity_id,
                action = %record.action,
                "audit store not configured, skipping audit entry"
            );
            return RecordOutcome::Skipped;
        };

        let actor = record
            .actor_identity
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| self.unknown_actor.clone());

        let entry = AuditEntry::new(
            actor,
            record.entity_type,
            record.entity_id,
            record.action,
            record.diff,
        );

        match store.append(&entry) {
            Ok(()) => {
                tracing::debug!(
                    id = %entry.id,
                    entity_type = %entry.entity_type,
                    entity_id = %entry.entity_id,
                    action = %entry.action,
                    changed = entry.diff.changes.len(),
                    "audit entry recorded"
                );
                RecordOutcome::Recorded(entry.id)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    store = %store.describe(),
                    entity_type = %entry.entity_type,
                    entity_id = %entry.entity_id,
                    action = %entry.action,
                    "failed to write audit entry"
                );
                RecordOutcome::Failed
            }
        }
    }

    /// Diff two entity states and record the implied action
    ///
    /// `before` is the entity prior to the write (`None` for creates) and
    /// `after` the entity afterwards (`None` for deletes).
    pub fn record_change<B, A>(
        &self,
        actor_identity: Option<&str>,
        entity_type: EntityType,
        entity_id: impl ToString,
        before: Option<&B>,
        after: Option<&A>,
    ) -> RecordOutcome
    where
        B: Serialize + ?Sized,
        A: Serialize + ?Sized,
    {
        let diff = build_diff(before, after);
        let entity_id = entity_id.to_string();

        let Some(action) = diff.inferred_action() else {
            tracing::warn!(
                entity_type = %entity_type,
                entity_id = %entity_id,
                "neither snapshot is present, skipping audit entry"
            );
            return RecordOutcome::Skipped;
        };

        self.record(AuditRecord::new(
            actor_identity.map(str::to_string),
            entity_type,
            entity_id,
            action,
            diff,
        ))
    }
}
