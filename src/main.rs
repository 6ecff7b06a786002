use clap::Parser;
use risk_keys::cli::{Cli, Commands};
use risk_keys::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::from_toml(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    risk_keys::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Size(args) => {
            args.execute(&config)?;
        }
        Commands::Session(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Risk: {}% - margin {}%",
                config.risk.risk_percent, config.risk.margin_percent
            );
            println!(
                "  Lines: stop={:?} entry={:?}, position label={:?}",
                config.risk.stop_line_label,
                config.risk.entry_line_label,
                config.risk.position_label
            );
            println!(
                "  Symbol: {} pip={} pip value={} min={} step={}",
                config.symbol.name,
                config.symbol.pip_size,
                config.symbol.pip_value,
                config.symbol.min_volume,
                config.symbol.volume_step
            );
            println!("  Paper balance: {}", config.paper.initial_balance);
        }
    }

    Ok(())
}
