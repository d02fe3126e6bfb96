//! `record` command
//!
//! Records one audit entry from snapshot files. Like the library recorder,
//! a store failure is reported but does not fail the command.

use std::path::PathBuf;

use clap::Args;

use super::read_snapshot;
use crate::audit::{
    diff_snapshots, open_store, Action, AuditRecord, AuditRecorder, EntityType, RecordOutcome,
};
use crate::config::paths::AuditPaths;
use crate::config::settings::Settings;
use crate::error::{AuditError, AuditResult};

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Type of the mutated entity (post, experience, work_sample, app, tool, skill, promo, site_settings)
    #[arg(short, long)]
    pub entity_type: EntityType,

    /// ID of the mutated entity
    #[arg(short = 'i', long)]
    pub entity_id: String,

    /// Identity of the admin who made the change
    #[arg(short, long, env = "FOLIO_AUDIT_ACTOR")]
    pub actor: Option<String>,

    /// Mutation kind (defaults to the one implied by the snapshots)
    #[arg(long)]
    pub action: Option<Action>,

    /// Snapshot before the mutation (JSON file, or '-')
    #[arg(short, long)]
    pub before: Option<PathBuf>,

    /// Snapshot after the mutation (JSON file, or '-')
    #[arg(short = 'A', long)]
    pub after: Option<PathBuf>,
}

/// Handle the record command
pub fn handle_record_command(
    paths: &AuditPaths,
    settings: &Settings,
    args: RecordArgs,
) -> AuditResult<()> {
    let before = read_snapshot(args.before.as_deref())?;
    let after = read_snapshot(args.after.as_deref())?;
    let diff = diff_snapshots(before, after);

    let action = match args.action.or_else(|| diff.inferred_action()) {
        Some(action) => action,
        None => {
            return Err(AuditError::Validation(
                "nothing to record: pass --before and/or --after".into(),
            ))
        }
    };

    let mut store_unavailable = false;
    let store = match open_store(settings, paths) {
        Ok(store) => store,
        Err(e) => {
            store_unavailable = true;
            tracing::error!(
                store = %settings.store,
                error = %e,
                "Failed to open audit store"
            );
            None
        }
    };

    let recorder = AuditRecorder::from_store(store)
        .with_unknown_actor(settings.unknown_actor.clone());

    let outcome = recorder.record(AuditRecord::new(
        args.actor,
        args.entity_type,
        args.entity_id,
        action,
        diff,
    ));

    match outcome {
        RecordOutcome::Recorded(id) => println!("Recorded audit entry {}", id),
        RecordOutcome::Skipped if store_unavailable => {
            eprintln!("Audit store unavailable; nothing recorded (see log output).")
        }
        RecordOutcome::Skipped => println!("Audit store not configured; nothing recorded."),
        RecordOutcome::Failed => eprintln!("Audit entry could not be written (see log output)."),
    }

    Ok(())
}
