use clap::Parser;
use crypto_collector::cli::{Cli, Commands};
use crypto_collector::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });
    config.apply_env_overrides()?;

    // Initialize logging (the metrics exporter starts with the run command)
    crypto_collector::telemetry::init_logging(&config.telemetry.log_level)?;

    match cli.command {
        Commands::Run(args) => {
            args.execute(config).await?;
        }
        Commands::Once(args) => {
            args.execute(config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Feed: {} {}",
                config.collector.exchange, config.collector.symbol
            );
            println!("  Poll interval: {}s", config.collector.poll_interval_secs);
            println!(
                "  Request timeout: {}ms",
                config.collector.request_timeout_ms
            );
            println!(
                "  Database: {}@{}:{}/{}",
                config.database.user, config.database.host, config.database.port, config.database.name
            );
            println!("  Metrics port: {}", config.telemetry.metrics_port);
            println!("  Log level: {}", config.telemetry.log_level);
        }
    }

    Ok(())
}
