//! AI provider credential commands.

use clap::Args;
use console::style;
use std::path::Path;
use workitt_core::config::AiPlatform;
use workitt_secrets::{AiSettings, SecretConfig};

use crate::prompt;

/// AI command arguments.
#[derive(Args)]
pub struct AiArgs {
    #[command(subcommand)]
    pub command: AiCommand,
}

#[derive(clap::Subcommand)]
pub enum AiCommand {
    /// Set the AI platform and its API key
    Set {
        /// Platform: deepseek, openai, claudeai, gemini, azure
        #[arg(long)]
        platform: AiPlatform,

        /// API key (if omitted, prompts for hidden input)
        #[arg(long)]
        api_key: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Azure endpoint URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Azure deployment name
        #[arg(long)]
        deployment: Option<String>,
    },
}

/// Run the AI command.
pub async fn run(args: AiArgs, data_dir: &Path) -> anyhow::Result<()> {
    let secrets = SecretConfig::open(data_dir);

    match args.command {
        AiCommand::Set {
            platform,
            api_key,
            model,
            endpoint,
            deployment,
        } => {
            let mut settings = AiSettings::new(platform);
            settings.model = model;
            if platform == AiPlatform::Azure {
                settings.endpoint = Some(prompt::value_or_prompt(endpoint, "Azure endpoint: ")?);
                settings.deployment =
                    Some(prompt::value_or_prompt(deployment, "Azure deployment: ")?);
            }

            let api_key = prompt::secret_or_prompt(
                api_key,
                &format!("{} API key: ", platform.display_name()),
            )?;
            if api_key.is_empty() {
                anyhow::bail!("API key must not be empty");
            }

            secrets.update(|doc| secrets.set_ai_credential(doc, &settings, &api_key))?;

            eprintln!(
                "{} {} credential stored.",
                style("*").green(),
                style(platform.display_name()).bold()
            );
        }
    }

    Ok(())
}
