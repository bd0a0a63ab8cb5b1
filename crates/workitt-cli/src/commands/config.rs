//! Configuration inspection commands.

use clap::Args;
use console::style;
use std::path::Path;
use workitt_core::{paths, ConfigHandle};

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show configuration with secrets masked
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, data_dir: &Path) -> anyhow::Result<()> {
    let config = ConfigHandle::open(data_dir);

    match args.command {
        ConfigCommand::Show { json } => {
            let masked = config.load()?.masked();
            if json {
                println!("{}", serde_json::to_string_pretty(&masked)?);
            } else {
                println!("{}", masked);
            }
        }

        ConfigCommand::Path => {
            println!("{}", paths::config_file(data_dir).display());
        }

        ConfigCommand::Validate => {
            let doc = config.load()?;
            match doc.validate() {
                Ok(()) => println!("{} Configuration is valid", style("*").green()),
                Err(e) => {
                    eprintln!("{} Configuration has problems", style("!").red().bold());
                    anyhow::bail!("{}", e);
                }
            }
        }
    }

    Ok(())
}
