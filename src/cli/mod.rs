//! CLI interface for crypto-collector
//!
//! Provides subcommands for:
//! - `run`: Start the collector loop
//! - `once`: Fetch a single tick without touching the database
//! - `config`: Show the resolved configuration

mod once;
mod run;

pub use once::OnceArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "crypto-collector")]
#[command(about = "Polling collector for cryptocurrency ticker prices")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the collector loop
    Run(RunArgs),
    /// Fetch a single tick and print it, without writing to the database
    Once(OnceArgs),
    /// Show the resolved configuration
    Config,
}
