//! Backup and restore commands.

use clap::Args;
use console::style;
use std::path::{Path, PathBuf};
use workitt_core::ConfigHandle;
use workitt_secrets::{create_backup, restore_backup, verify_backup};

use crate::prompt;

/// Backup command arguments.
#[derive(Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub command: BackupCommand,
}

#[derive(clap::Subcommand)]
pub enum BackupCommand {
    /// Back up the configuration and master key
    Create {
        /// Directory to create the backup in (default: <data-dir>/backups)
        #[arg(long)]
        dest: Option<PathBuf>,
    },

    /// Restore a backup, replacing the current configuration and key
    Restore {
        /// Backup directory (containing manifest.json)
        dir: PathBuf,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Run the backup command.
pub async fn run(args: BackupArgs, data_dir: &Path) -> anyhow::Result<()> {
    let config = ConfigHandle::open(data_dir);

    match args.command {
        BackupCommand::Create { dest } => {
            let backup = create_backup(&config, dest.as_deref())?;
            eprintln!(
                "{} Backed up {} file(s). Contains the master key; store it privately.",
                style("*").green(),
                backup.manifest.files.len()
            );
            println!("{}", backup.dir.display());
        }

        BackupCommand::Restore { dir, yes } => {
            let backup = verify_backup(&dir)?;
            if !yes {
                let warning = format!(
                    "Restoring the backup from {} replaces the current configuration{}.",
                    backup.manifest.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    if backup.manifest.has_key() { " and master key" } else { "" }
                );
                if !prompt::confirm_destructive(&warning)? {
                    eprintln!("Aborted.");
                    return Ok(());
                }
            }

            let report = restore_backup(&config, &dir)?;
            eprintln!(
                "{} Restored {}",
                style("*").green(),
                report.restored.join(", ")
            );
            eprintln!(
                "  Previous data saved to {}",
                style(report.snapshot.dir.display()).dim()
            );
        }
    }

    Ok(())
}
