//! Ledgermind - AI assistant panel for business data
//!
#![doc = "Ledgermind - AI assistant panel for business data"]
#![doc = "Main entry point for the Ledgermind CLI."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ledgermind::cli::{Cli, Commands};
use ledgermind::commands;
use ledgermind::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { endpoint } => {
            if let Some(e) = &endpoint {
                tracing::debug!("Using endpoint override: {}", e);
            }

            commands::chat::run_chat(config, endpoint).await?;
            Ok(())
        }
        Commands::Summarize { kind, record } => {
            commands::summarize::run_summarize(config, &kind, &record).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "ledgermind=debug"
    } else {
        "ledgermind=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
