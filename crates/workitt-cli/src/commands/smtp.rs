//! Mail credential commands.

use clap::Args;
use console::style;
use std::path::Path;
use workitt_core::config::DEFAULT_SMTP_PORT;
use workitt_secrets::{SecretConfig, SmtpSettings};

use crate::prompt;

/// SMTP command arguments.
#[derive(Args)]
pub struct SmtpArgs {
    #[command(subcommand)]
    pub command: SmtpCommand,
}

#[derive(clap::Subcommand)]
pub enum SmtpCommand {
    /// Set the mail server and its login
    Set {
        /// SMTP server host
        #[arg(long)]
        host: String,

        /// SMTP server port
        #[arg(long, default_value_t = DEFAULT_SMTP_PORT)]
        port: u16,

        /// Disable STARTTLS
        #[arg(long)]
        no_tls: bool,

        /// Login name (if omitted, prompts)
        #[arg(long)]
        username: Option<String>,

        /// Password (if omitted, prompts for hidden input)
        #[arg(long)]
        password: Option<String>,
    },
}

/// Run the SMTP command.
pub async fn run(args: SmtpArgs, data_dir: &Path) -> anyhow::Result<()> {
    let secrets = SecretConfig::open(data_dir);

    match args.command {
        SmtpCommand::Set {
            host,
            port,
            no_tls,
            username,
            password,
        } => {
            let username = prompt::value_or_prompt(username, "SMTP username: ")?;
            let password = prompt::secret_or_prompt(password, "SMTP password: ")?;
            let settings = SmtpSettings {
                host,
                port,
                use_tls: !no_tls,
            };

            secrets.update(|doc| secrets.set_smtp(doc, &settings, &username, &password))?;

            eprintln!(
                "{} SMTP credentials stored for {}",
                style("*").green(),
                style(format!("{}:{}", settings.host, settings.port)).bold()
            );
        }
    }

    Ok(())
}
