mod catalog;
mod cli;
mod commands;
mod config;
mod datasources;
mod error;
mod logic;
mod models;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if let Commands::Init = cli.command {
        Config::setup_interactive()?;
        return Ok(());
    }

    // Load configuration, running first-time setup when none is found
    let config = if Config::exists(cli.config.as_ref()) {
        match Config::load(cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                eprintln!("Run `fertigate init` to set up again.");
                std::process::exit(1);
            }
        }
    } else {
        let (config, _) = Config::setup_interactive()?;
        config
    };

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Check => commands::check(&config).await?,
        Commands::Crops => commands::crops(&config)?,
        Commands::Stages { crop } => commands::stages(&config, &crop)?,
        Commands::Delta { crop, stage } => {
            commands::delta(&config, &crop, stage.as_deref())?
        }
        Commands::Plan {
            crop,
            stage,
            soil,
            water,
        } => {
            commands::plan(
                &config,
                &crop,
                stage.as_deref(),
                soil.as_deref(),
                water.as_deref(),
            )
            .await?
        }
    }

    Ok(())
}
