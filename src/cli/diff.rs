//! `diff` command
//!
//! Prints the audit diff between two snapshot files.

use std::path::PathBuf;

use clap::Args;

use super::read_snapshot;
use crate::audit::diff_snapshots;
use crate::config::settings::Settings;
use crate::error::AuditResult;

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Snapshot before the mutation (JSON file, or '-' if it did not exist)
    pub before: PathBuf,

    /// Snapshot after the mutation (JSON file, or '-' if it no longer exists)
    pub after: PathBuf,

    /// Print a one-line summary instead of the full diff
    #[arg(short, long)]
    pub summary: bool,
}

/// Handle the diff command
pub fn handle_diff_command(settings: &Settings, args: DiffArgs) -> AuditResult<()> {
    let before = read_snapshot(Some(args.before.as_path()))?;
    let after = read_snapshot(Some(args.after.as_path()))?;

    let diff = diff_snapshots(before, after);

    if args.summary {
        match diff.summary_with_limit(settings.summary_max_len) {
            Some(summary) => println!("{}", summary),
            None => println!("No changes."),
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&diff)?);
    }

    Ok(())
}
