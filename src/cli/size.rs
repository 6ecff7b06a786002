//! Size command implementation

use clap::Args;
use rust_decimal::Decimal;

use crate::config::Config;
use crate::market::Quote;
use crate::risk::{EntryMode, RiskOrderCalculator, SizingRequest};

#[derive(Args, Debug)]
pub struct SizeArgs {
    /// Stop-loss price
    #[arg(long)]
    pub stop: Decimal,

    /// Current bid
    #[arg(long)]
    pub bid: Decimal,

    /// Current ask
    #[arg(long)]
    pub ask: Decimal,

    /// Limit entry price; sizes a market order when omitted
    #[arg(long)]
    pub entry: Option<Decimal>,

    /// Account balance (defaults to the paper balance)
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl SizeArgs {
    /// Build the sizing request these arguments describe
    pub fn request(&self, config: &Config) -> SizingRequest {
        let quote = Quote::new(self.bid, self.ask);
        let entry = match self.entry {
            Some(entry_price) => EntryMode::Limit { entry_price, quote },
            None => EntryMode::Market(quote),
        };

        SizingRequest {
            account_balance: self.balance.unwrap_or(config.paper.initial_balance),
            risk_percent: config.risk.risk_percent,
            margin_percent: config.risk.margin_percent,
            stop_price: self.stop,
            symbol: config.symbol.clone(),
            entry,
        }
    }

    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let request = self.request(config);
        let calculator = RiskOrderCalculator::from_config(&config.risk);

        match calculator.compute(&request) {
            Ok(sizing) if self.json => {
                println!("{}", serde_json::to_string_pretty(&sizing)?);
            }
            Ok(sizing) => {
                println!("{} {}", sizing.direction, request.symbol.name);
                println!("  Entry:        {}", sizing.entry_price);
                println!("  Stop:         {}", sizing.stop_price);
                println!("  Stop pips:    {}", sizing.stop_distance_pips.round_dp(2));
                println!("  Risk:         {}% = {}", sizing.adjusted_risk_percent, sizing.risk_amount);
                println!("  Raw volume:   {}", sizing.raw_volume.round_dp(4));
                println!("  Volume:       {}", sizing.volume);
                if sizing.promoted_to_minimum {
                    println!("  Note: raised to the broker minimum, actual risk is higher");
                }
            }
            Err(rejection) => {
                tracing::warn!(reason = rejection.code(), "Sizing rejected");
                if self.json {
                    println!(
                        "{}",
                        serde_json::json!({ "rejected": rejection.code(), "message": rejection.to_string() })
                    );
                } else {
                    println!("Rejected: {}", rejection);
                }
            }
        }

        Ok(())
    }
}
