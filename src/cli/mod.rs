//! CLI interface for risk-keys
//!
//! Provides subcommands for:
//! - `size`: Size one order from a stop level and a quote
//! - `session`: Drive a paper desk from a click script
//! - `config`: Show configuration

mod session;
mod size;

pub use session::{parse_script, run_session, SessionArgs, SessionOutcome, SessionStep};
pub use size::SizeArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "risk-keys")]
#[command(about = "Risk-normalized order sizing and position management desk")]
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
    /// Size one order without placing it
    Size(SizeArgs),
    /// Run a paper desk session from a script
    Session(SessionArgs),
    /// Show configuration
    Config,
}
