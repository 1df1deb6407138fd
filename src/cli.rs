use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fertigate", version, about = "Fertigation planning CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config, catalog curves and service connectivity
    Check,
    /// List crops available in the catalog
    Crops,
    /// List growth stages for a crop
    Stages {
        /// Crop id (see `fertigate crops`)
        crop: String,
    },
    /// Show stage-relative nutrient requirements (offline)
    Delta {
        /// Crop id
        crop: String,
        /// Stage id; omit for a crop without a curve
        #[arg(short, long)]
        stage: Option<String>,
    },
    /// Compute a fertigation program for a crop stage
    Plan {
        /// Crop id
        crop: String,
        /// Stage id; omit for a crop without a curve
        #[arg(short, long)]
        stage: Option<String>,
        /// Soil analysis JSON file
        #[arg(long)]
        soil: Option<PathBuf>,
        /// Water analysis JSON file
        #[arg(long)]
        water: Option<PathBuf>,
    },
}
