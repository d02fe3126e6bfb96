//! Audit entry data structures
//!
//! Defines the structure of audit trail entries including action kinds,
//! the audited entity types, and the entry format itself.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::diff::{AuditDiff, DEFAULT_SUMMARY_MAX_LEN};
use crate::error::AuditError;

/// Kind of mutation being audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// Entity was created
    Create,
    /// Entity was updated
    Update,
    /// Entity was deleted
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "CREATE",
            Action::Update => "UPDATE",
            Action::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREATE" => Ok(Action::Create),
            "UPDATE" => Ok(Action::Update),
            "DELETE" => Ok(Action::Delete),
            other => Err(AuditError::Validation(format!("unknown action '{}'", other))),
        }
    }
}

/// Types of site content that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Post,
    Experience,
    WorkSample,
    App,
    Tool,
    Skill,
    Promo,
    SiteSettings,
}

impl EntityType {
    pub const ALL: [EntityType; 8] = [
        EntityType::Post,
        EntityType::Experience,
        EntityType::WorkSample,
        EntityType::App,
        EntityType::Tool,
        EntityType::Skill,
        EntityType::Promo,
        EntityType::SiteSettings,
    ];

    /// Stored string form, as written to the audit log
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Post => "post",
            EntityType::Experience => "experience",
            EntityType::WorkSample => "work_sample",
            EntityType::App => "app",
            EntityType::Tool => "tool",
            EntityType::Skill => "skill",
            EntityType::Promo => "promo",
            EntityType::SiteSettings => "site_settings",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "posts" | "blog" => Ok(EntityType::Post),
            "experiences" => Ok(EntityType::Experience),
            "work" | "work_samples" => Ok(EntityType::WorkSample),
            "apps" => Ok(EntityType::App),
            "tools" => Ok(EntityType::Tool),
            "skills" => Ok(EntityType::Skill),
            "promos" | "banner" => Ok(EntityType::Promo),
            "settings" | "footer" => Ok(EntityType::SiteSettings),
            other => EntityType::ALL
                .into_iter()
                .find(|t| t.as_str() == other)
                .ok_or_else(|| AuditError::Validation(format!("unknown entity type '{}'", s))),
        }
    }
}

/// A single, immutable audit trail entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique identifier of this entry
    pub id: Uuid,

    /// Who performed the mutation (`"unknown"` when not known)
    pub actor_identity: String,

    /// Type of entity affected
    pub entity_type: EntityType,

    /// ID of the affected entity, always stored as a string
    pub entity_id: String,

    /// Kind of mutation performed
    pub action: Action,

    /// Whole before/after snapshots plus the changed fields
    pub diff: AuditDiff,

    /// When the entry was created (UTC)
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Create a new entry stamped with a fresh id and the current time
    pub fn new(
        actor_identity: impl Into<String>,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        action: Action,
        diff: AuditDiff,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_identity: actor_identity.into(),
            entity_type,
            entity_id: entity_id.into(),
            action,
            diff,
            created_at: Utc::now(),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        self.format_with_summary_limit(DEFAULT_SUMMARY_MAX_LEN)
    }

    /// Like [`AuditEntry::format_human_readable`] with a custom string truncation length
    pub fn format_with_summary_limit(&self, max_len: usize) -> String {
        let mut output = format!(
            "[{}] {} {} {} by {}",
            self.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.action,
            self.entity_type,
            self.entity_id,
            self.actor_identity
        );

        if let Some(summary) = self.diff.summary_with_limit(max_len) {
            output.push_str(&format!("\n  Changes: {}", summary));
        }

        output
    }
}

/// Filter for reading back the audit trail
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditQuery {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub actor_identity: Option<String>,
    /// Keep only the most recent N matches
    pub limit: Option<usize>,
}

impl AuditQuery {
    pub fn all() -> Self {
        Self::default()
    }

    /// All entries for a single entity
    pub fn for_entity(entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type: Some(entity_type),
            entity_id: Some(entity_id.into()),
            ..Self::default()
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor_identity = Some(actor.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check whether an entry passes the filters (ignores `limit`)
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.entity_type.map_or(true, |t| entry.entity_type == t)
            && self
                .entity_id
                .as_deref()
                .map_or(true, |id| entry.entity_id == id)
            && self
                .actor_identity
                .as_deref()
                .map_or(true, |actor| entry.actor_identity == actor)
    }

    /// Filter entries (oldest first) and keep the most recent `limit`
    pub fn apply(&self, entries: Vec<AuditEntry>) -> Vec<AuditEntry> {
        let mut matched: Vec<AuditEntry> = entries.into_iter().filter(|e| self.matches(e)).collect();

        if let Some(limit) = self.limit {
            let start = matched.len().saturating_sub(limit);
            matched.drain(..start);
        }

        matched
    }
}
