use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use folio_audit::audit::open_store;
use folio_audit::cli::{
    handle_diff_command, handle_log_command, handle_record_command, DiffArgs, LogArgs, RecordArgs,
};
use folio_audit::config::{paths::AuditPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "folio-audit",
    version,
    about = "Field-level audit trail for the portfolio admin back office",
    long_about = "folio-audit computes before/after diffs of site content \
                  (posts, work samples, apps, tools, skills, promos, settings) \
                  and appends them to an immutable audit trail."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the field-level diff between two snapshot files
    Diff(DiffArgs),

    /// Record an audit entry for a mutation
    Record(RecordArgs),

    /// List audit trail entries
    #[command(alias = "trail")]
    Log(LogArgs),

    /// Write default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = AuditPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Diff(args)) => handle_diff_command(&settings, args)?,
        Some(Commands::Record(args)) => handle_record_command(&paths, &settings, args)?,
        Some(Commands::Log(args)) => handle_log_command(&paths, &settings, args)?,
        Some(Commands::Init) => {
            println!("Initializing folio-audit at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Settings written to {}", paths.settings_file().display());
            println!("Audit store: {}", settings.store);
        }
        Some(Commands::Config) => {
            println!("folio-audit Configuration");
            println!("=========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Store backend:  {}", settings.store);
            println!("  Unknown actor:  {}", settings.unknown_actor);
            match open_store(&settings, &paths)? {
                Some(store) => println!("  Store location: {}", store.describe()),
                None => println!("  Store location: (not configured)"),
            }
        }
        None => {
            println!("folio-audit - audit trail for site content");
            println!();
            println!("Run 'folio-audit --help' for usage information.");
        }
    }

    Ok(())
}
