//! Workitt CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workitt_cli::{run, Cli};
use workitt_core::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first; verbosity picks the default filter
    let cli = Cli::parse();

    // Initialize logging. Logs go to stderr so stdout stays scriptable.
    let default_filter = match cli.verbose {
        0 => "workitt=info",
        1 => "workitt=debug",
        _ => "workitt=trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let json = env::get_bool(env::LOG_JSON_ENV);

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    // Run the command
    run(cli).await
}
