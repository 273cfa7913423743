//! Scenario loading
//!
//! A scenario is a JSON [`SimulationConfig`]. Without one the binary runs the
//! built-in household below.

use std::path::Path;

use color_eyre::eyre::{Context, Result};
use flowsim_core::config::{SimulationBuilder, SimulationConfig};
use flowsim_core::model::{LineItem, TransactionKind, WeekdayOdds};
use flowsim_core::money::Usd;
use flowsim_core::random::BetaDistribution;

pub fn load(path: &Path) -> Result<SimulationConfig> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read scenario {}", path.display()))?;
    let config: SimulationConfig = serde_json::from_str(&text)
        .wrap_err_with(|| format!("failed to parse scenario {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Two-salary household sweeping its savings into a peer-to-peer portfolio
/// from 2018-01-01 through 2049-01-01 inclusive.
pub fn household() -> Result<SimulationConfig> {
    let restaurant_odds = WeekdayOdds {
        friday: 0.75,
        saturday: 0.5,
        sunday: 0.75,
        ..WeekdayOdds::every_day(0.25)
    };

    let config = SimulationBuilder::new()
        .start(2018, 1, 1)
        .end(2049, 1, 1)
        .basic_account("Checking", Usd::dollars(500))
        .peer_to_peer_account(
            "Investment",
            Usd::dollars(8_000 + 40_000 + 30_000 + 2_000_000),
            Usd::dollars(25),
        )
        .line_items([
            LineItem::monthly_deposit("Checking", "Salary", Usd::dollars(7_000), 1),
            LineItem::monthly_deposit("Checking", "Salary", Usd::dollars(7_000), 15),
            LineItem::monthly_withdrawal("Checking", "BCBS", Usd::dollars(630), 17),
            LineItem::monthly_withdrawal("Checking", "Mortgage", Usd::dollars(1_154), 2),
            LineItem::monthly_withdrawal("Checking", "Water", Usd::dollars(60), 20),
            LineItem::monthly_withdrawal("Checking", "Electricity", Usd::dollars(115), 10),
            LineItem::monthly_withdrawal("Checking", "Internet", Usd::dollars(40), 12),
            LineItem::monthly_withdrawal("Checking", "Phones", Usd::dollars(100), 8),
            LineItem::daily_random(
                "Checking",
                "Restaurant Food",
                TransactionKind::Withdrawal,
                Usd::dollars(25),
                Usd::dollars(60),
                BetaDistribution::new(1.0, 4.0)?,
                restaurant_odds,
            ),
            LineItem::monthly_transfer("Checking", "Investment", Usd::dollars(2_000), 2),
            LineItem::monthly_transfer("Checking", "Investment", Usd::dollars(2_000), 17),
        ])
        .build()?;
    Ok(config)
}
