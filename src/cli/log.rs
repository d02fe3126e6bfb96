//! `log` command
//!
//! Lists the audit trail, oldest first.

use clap::Args;

use crate::audit::{open_store, AuditQuery, EntityType};
use crate::config::paths::AuditPaths;
use crate::config::settings::Settings;
use crate::error::AuditResult;

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Only entries for this entity type
    #[arg(short, long)]
    pub entity_type: Option<EntityType>,

    /// Only entries for this entity ID
    #[arg(short = 'i', long)]
    pub entity_id: Option<String>,

    /// Only entries made by this actor
    #[arg(short, long)]
    pub actor: Option<String>,

    /// Number of most recent entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,

    /// Print entries as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl LogArgs {
    fn to_query(&self) -> AuditQuery {
        AuditQuery {
            entity_type: self.entity_type,
            entity_id: self.entity_id.clone(),
            actor_identity: self.actor.clone(),
            limit: Some(self.limit),
        }
    }
}

/// Handle the log command
pub fn handle_log_command(paths: &AuditPaths, settings: &Settings, args: LogArgs) -> AuditResult<()> {
    let Some(store) = open_store(settings, paths)? else {
        println!("Audit store not configured.");
        return Ok(());
    };

    let entries = store.query(&args.to_query())?;

    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for entry in &entries {
        if args.json {
            println!("{}", serde_json::to_string(entry)?);
        } else {
            println!("{}", entry.format_with_summary_limit(settings.summary_max_len));
        }
    }

    if !args.json {
        println!("\nShowing {} of {} entries", entries.len(), store.count()?);
    }

    Ok(())
}
