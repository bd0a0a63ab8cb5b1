//! Workitt administrative command-line interface.

pub mod commands;
pub mod prompt;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use workitt_core::paths;

/// Workitt - master key and encrypted settings administration
#[derive(Parser)]
#[command(name = "workitt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory holding config.json and the key
    #[arg(long, env = paths::DATA_DIR_ENV, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The data directory to operate on.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::data_dir)
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Manage the master key
    Key(commands::key::KeyArgs),

    /// Configure the AI provider credential
    Ai(commands::ai::AiArgs),

    /// Configure the outbound mail credential
    Smtp(commands::smtp::SmtpArgs),

    /// Inspect the configuration
    Config(commands::config::ConfigArgs),

    /// Back up or restore the data directory
    Backup(commands::backup::BackupArgs),

    /// Show version information
    Version,
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = cli.data_dir();
    debug!(data_dir = %data_dir.display(), "resolved data directory");
    match cli.command {
        Commands::Key(args) => commands::key::run(args, &data_dir).await,
        Commands::Ai(args) => commands::ai::run(args, &data_dir).await,
        Commands::Smtp(args) => commands::smtp::run(args, &data_dir).await,
        Commands::Config(args) => commands::config::run(args, &data_dir).await,
        Commands::Backup(args) => commands::backup::run(args, &data_dir).await,
        Commands::Version => {
            println!("workitt {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
