//! `clubhub` command-line client
//!
//! Run with:
//! ```bash
//! cargo run -p clubhub-cli -- communities
//! cargo run -p clubhub-cli -- chat --room 3 --username alice --user-id 7
//! ```
//!
//! Configuration is loaded from `CLUBHUB_*` environment variables (or a
//! config file via `--config`); flags override both.

mod args;
mod commands;

use clap::Parser;
use clubhub_common::{try_init_tracing_with_config, ClientConfig, TracingConfig};
use tracing::error;

use crate::args::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };

    let mut tracing_config = TracingConfig::from_settings(&config.log);
    if cli.verbose {
        tracing_config.filter = "debug".to_string();
    }
    if let Err(e) = try_init_tracing_with_config(&tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = commands::run(cli, config).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(Some(path.as_path()))?,
        None => ClientConfig::from_env()?,
    };

    if let Some(url) = &cli.api_url {
        config.api.base_url.clone_from(url);
    }
    if let Some(url) = &cli.chat_url {
        config.chat.url.clone_from(url);
    }
    if let Some(token) = cli.token.as_ref().filter(|t| !t.trim().is_empty()) {
        config.api.token = Some(token.clone());
    }

    config.validate()?;
    Ok(config)
}
