//! Master key commands.

use clap::Args;
use console::style;
use std::path::Path;
use workitt_core::ConfigHandle;
use workitt_secrets::{KeyFileState, KeyStore, RegenerationScope};

use crate::prompt;

/// Key command arguments.
#[derive(Args)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

#[derive(clap::Subcommand)]
pub enum KeyCommand {
    /// Generate a new master key, destroying every stored secret
    Generate {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,

        /// Also reset non-secret settings to defaults
        #[arg(long)]
        wipe_config: bool,
    },

    /// Show the master key's location and state
    Status,
}

/// Run the key command.
pub async fn run(args: KeyArgs, data_dir: &Path) -> anyhow::Result<()> {
    let keys = KeyStore::new(ConfigHandle::open(data_dir));

    match args.command {
        KeyCommand::Generate { yes, wipe_config } => {
            let had_key = keys.status()?.path.is_some();
            if !yes {
                let warning = if had_key {
                    "Generating a new key permanently destroys every stored secret."
                } else {
                    "This creates the master key that protects all stored secrets."
                };
                if !prompt::confirm_destructive(warning)? {
                    eprintln!("Aborted.");
                    return Ok(());
                }
            }

            let scope = if wipe_config {
                RegenerationScope::Everything
            } else {
                RegenerationScope::SecretsOnly
            };
            keys.generate_with(scope)?;

            let status = keys.status()?;
            eprintln!("{} Master key generated.", style("*").green());
            if let Some(path) = status.path {
                println!("{}", path.display());
            }
            if had_key {
                eprintln!(
                    "  {}",
                    style("Re-enter the AI and SMTP credentials; previous values are gone.").dim()
                );
            }
        }

        KeyCommand::Status => {
            let status = keys.status()?;
            let path = status
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "[NOT CONFIGURED]".to_string());
            let generated = status
                .generated_at
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "[NOT CONFIGURED]".to_string());
            let state = match status.file {
                KeyFileState::NotConfigured => style("not configured".to_string()).yellow(),
                KeyFileState::Present => style("present".to_string()).green(),
                KeyFileState::Missing => style("MISSING".to_string()).red().bold(),
                KeyFileState::WrongLength(len) => {
                    style(format!("INVALID ({len} bytes)")).red().bold()
                }
            };

            println!("Path:      {}", path);
            println!("Generated: {}", generated);
            println!("Key file:  {}", state);

            if status.file == KeyFileState::Missing {
                eprintln!(
                    "  Restore the key from a backup, or run {} and re-enter all secrets.",
                    style("workitt key generate").bold()
                );
            }
        }
    }

    Ok(())
}
