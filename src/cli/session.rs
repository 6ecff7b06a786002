//! Session command implementation
//!
//! Replays a click script against a paper desk. One step per line:
//!
//! ```text
//! quote 1.1048 1.1050
//! line SL 1.1000
//! click ENTER
//! erase SL
//! status
//! ```

use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};
use clap::Args;
use rust_decimal::Decimal;

use crate::config::Config;
use crate::desk::{CommandId, CommandTable, Desk};
use crate::execution::{ExecutionEngine, Fill, PaperEngine, PendingOrder};
use crate::host::{AccountSource, ChartLines, PaperMarket};
use crate::market::Quote;
use crate::risk::OpenPosition;

#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Script file; reads stdin when omitted
    pub script: Option<PathBuf>,
}

/// One scripted action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStep {
    /// New bid/ask
    Quote(Quote),
    /// Draw a labelled horizontal line
    Line { label: String, price: Decimal },
    /// Remove lines by label
    Erase(String),
    /// Press a desk button
    Click(CommandId),
    /// Print balance, positions and pending orders
    Status,
}

/// Paper desk state when a session ends
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub balance: Decimal,
    pub positions: Vec<OpenPosition>,
    pub pending: Vec<PendingOrder>,
    pub fills: Vec<Fill>,
}

impl FromStr for SessionStep {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let step = match parts.as_slice() {
            ["quote", bid, ask] => {
                let bid = Decimal::from_str(bid).context("invalid bid")?;
                let ask = Decimal::from_str(ask).context("invalid ask")?;
                let quote = Quote::new(bid, ask);
                if quote.is_crossed() {
                    bail!("bid {} above ask {}", bid, ask);
                }
                SessionStep::Quote(quote)
            }
            ["line", label, price] => SessionStep::Line {
                label: label.to_string(),
                price: Decimal::from_str(price).context("invalid price")?,
            },
            ["erase", label] => SessionStep::Erase(label.to_string()),
            ["click", command] => SessionStep::Click(command.parse()?),
            ["status"] => SessionStep::Status,
            _ => bail!("unrecognized step {:?}", s),
        };
        Ok(step)
    }
}

/// Parse a script, skipping blank lines and `#` comments
pub fn parse_script(script: &str) -> anyhow::Result<Vec<SessionStep>> {
    script
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| line.parse::<SessionStep>().with_context(|| format!("line {}", n)))
        .collect()
}

impl SessionArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let script = match &self.script {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            }
        };

        let steps = parse_script(&script)?;
        tracing::info!(steps = steps.len(), symbol = %config.symbol.name, "Starting paper session");
        run_session(config, steps).await?;
        Ok(())
    }
}

/// Run parsed steps against a fresh paper desk
pub async fn run_session(config: &Config, steps: Vec<SessionStep>) -> anyhow::Result<SessionOutcome> {
    let table = CommandTable::new(&config.risk);
    let engine = PaperEngine::new(config.symbol.clone(), config.paper.initial_balance);
    let mut market = PaperMarket::new(config.symbol.clone());
    let mut chart = ChartLines::new();

    for step in steps {
        match step {
            SessionStep::Quote(quote) => {
                market.set_quote(quote);
                for fill in engine.on_quote(quote).await {
                    println!(
                        "{:?}: {} {} at {}, realized {}",
                        fill.kind,
                        fill.direction,
                        fill.volume,
                        fill.price,
                        fill.realized_pnl.round_dp(2)
                    );
                }
            }
            SessionStep::Line { label, price } => chart.draw(label, price),
            SessionStep::Erase(label) => {
                chart.erase(&label);
            }
            SessionStep::Click(command) => {
                let desk = Desk::new(&config.risk, &chart, &market, &engine, &engine);
                match table.dispatch(command, &desk).await {
                    Ok(report) => println!("[{}] {}", command, report),
                    Err(err) => println!("[{}] {}", command, err),
                }
            }
            SessionStep::Status => {
                println!("Balance: {}", engine.balance().await?.round_dp(2));
                for position in engine.positions().await {
                    println!(
                        "  {} {} {} @ {} stop {:?} target {:?}",
                        position.label,
                        position.direction,
                        position.volume,
                        position.entry_price,
                        position.stop_loss,
                        position.take_profit
                    );
                }
                for pending in engine.pending_orders().await {
                    println!(
                        "  pending {} {} @ {}",
                        pending.order.direction, pending.order.volume, pending.price
                    );
                }
            }
        }
    }

    let outcome = SessionOutcome {
        balance: engine.balance().await?,
        positions: engine.positions().await,
        pending: engine.pending_orders().await,
        fills: engine.get_fills().await?,
    };
    tracing::info!(
        fills = outcome.fills.len(),
        balance = %outcome.balance,
        "Paper session finished"
    );
    Ok(outcome)
}
