mod commands;

use clap::{Parser, Subcommand};
use satchel_core::config::SatchelConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "satchel")]
#[command(about = "Backup record sync client for a remote record store")]
#[command(version)]
struct Cli {
    /// Path to the satchel config directory (default: ~/.satchel)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize satchel configuration and the local store
    Init,

    /// Check that the record store can accept backups
    Status,

    /// List backup records
    List {
        /// Restrict to records owned by one recipient
        #[arg(long)]
        recipient: Option<String>,

        /// List manifest owners instead of record names
        #[arg(long)]
        manifests: bool,
    },

    /// Round-trip a diagnostic record through the store
    Check {
        /// Recipient to write the test record under
        recipient: String,
    },

    /// Cancel operations left behind by a previous process instance
    Reconcile,

    /// Delete every record a recipient owns
    Delete {
        recipient: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base_dir = match cli.config_dir {
        Some(ref dir) => dir.clone(),
        None => SatchelConfig::default_base_dir()?,
    };

    // The configured filter applies once `satchel init` has run; before
    // that, fall back to the built-in default.
    let directive = SatchelConfig::load(&SatchelConfig::default_path(&base_dir))
        .map(|c| c.satchel.log_filter)
        .unwrap_or_else(|_| "satchel=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().unwrap_or_else(|_| {
                    "satchel=info".parse().unwrap()
                })),
        )
        .init();

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Init => commands::init::run(&base_dir),
        Commands::Status => rt.block_on(commands::status::run(&base_dir)),
        Commands::List {
            ref recipient,
            manifests,
        } => rt.block_on(commands::list::run(&base_dir, recipient.as_deref(), manifests)),
        Commands::Check { ref recipient } => {
            rt.block_on(commands::check::run(&base_dir, recipient))
        }
        Commands::Reconcile => rt.block_on(commands::reconcile::run(&base_dir)),
        Commands::Delete { ref recipient } => {
            rt.block_on(commands::delete::run(&base_dir, recipient))
        }
    }
}
