//! Tests for the Builder DSL and configuration validation

use jiff::civil::date;

use crate::config::{AccountConfig, SimulationBuilder, SimulationConfig};
use crate::error::ConfigError;
use crate::model::{LineItem, TransactionKind, WeekdayOdds};
use crate::money::Usd;
use crate::random::BetaDistribution;

/// Test basic SimulationBuilder usage
#[test]
fn test_simulation_builder_basic() {
    let config = SimulationBuilder::new()
        .start(2018, 1, 1)
        .years(31)
        .seed(42)
        .build()
        .unwrap();

    assert_eq!(config.start_date, date(2018, 1, 1));
    assert_eq!(config.end_date, date(2048, 12, 31));
    assert_eq!(config.seed, 42);
    assert!(config.accounts.is_empty());
}

#[test]
fn test_builder_defaults_to_one_year() {
    let config = SimulationBuilder::new().start(2020, 3, 1).build().unwrap();
    assert_eq!(config.end_date, date(2021, 2, 28));
    assert_eq!(config.days(), 365);
}

#[test]
fn test_explicit_end_overrides_years() {
    let config = SimulationBuilder::new()
        .start(2018, 1, 1)
        .years(10)
        .end(2018, 1, 30)
        .build()
        .unwrap();
    assert_eq!(config.days(), 30);
}

#[test]
fn test_builder_accounts_and_items() {
    let config = SimulationBuilder::new()
        .start(2018, 1, 1)
        .basic_account("Checking", Usd::dollars(500))
        .loan_account("Car", Usd::dollars(10_000), 6.0, 5)
        .peer_to_peer_account("Investment", Usd::dollars(1_000), Usd::dollars(25))
        .line_items([
            LineItem::monthly_deposit("Checking", "Salary", Usd::dollars(7_000), 1),
            LineItem::loan_payment("Checking", "Car", 5),
        ])
        .build()
        .unwrap();

    assert_eq!(config.accounts.len(), 3);
    assert_eq!(config.line_items.len(), 2);

    let bank = config.build_bank().unwrap();
    assert_eq!(bank.accounts().count(), 3);
    assert!(bank.account("Car").unwrap().as_loan().is_some());
    assert_eq!(
        bank.account("Investment").unwrap().current_balance(),
        Usd::dollars(1_000)
    );
}

#[test]
fn test_invalid_date_range() {
    let err = SimulationBuilder::new()
        .start(2018, 6, 1)
        .end(2018, 5, 31)
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDateRange { .. }));
}

#[test]
fn test_duplicate_account() {
    let err = SimulationBuilder::new()
        .basic_account("Checking", Usd::dollars(1))
        .basic_account("Checking", Usd::dollars(2))
        .build()
        .unwrap_err();
    assert_eq!(err, ConfigError::DuplicateAccount("Checking".into()));
}

#[test]
fn test_unknown_account_in_line_item() {
    let err = SimulationBuilder::new()
        .basic_account("Checking", Usd::dollars(1))
        .line_item(LineItem::monthly_transfer("Checking", "Savings", Usd::dollars(5), 1))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnknownAccount { ref account, .. } if account == "Savings"
    ));
}

#[test]
fn test_invalid_probability_and_terms() {
    let err = SimulationBuilder::new()
        .basic_account("Checking", Usd::dollars(1))
        .line_item(LineItem::daily_random(
            "Checking",
            "Lottery",
            TransactionKind::Withdrawal,
            Usd::dollars(1),
            Usd::dollars(2),
            BetaDistribution::new(1.0, 1.0).unwrap(),
            WeekdayOdds::every_day(1.5),
        ))
        .build()
        .unwrap_err();
    assert_eq!(err, ConfigError::InvalidProbability(1.5));

    let err = SimulationBuilder::new()
        .loan_account("Car", Usd::dollars(1_000), 5.0, 0)
        .build()
        .unwrap_err();
    assert_eq!(err, ConfigError::InvalidLoanTerm("Car".into()));

    let err = SimulationBuilder::new()
        .peer_to_peer_account("Investment", Usd::dollars(1_000), Usd::ZERO)
        .build()
        .unwrap_err();
    assert_eq!(err, ConfigError::InvalidInvestmentSize("Investment".into()));
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "start_date": "2018-01-01",
        "end_date": "2018-01-31",
        "seed": 3,
        "accounts": [
            { "type": "basic", "name": "Checking", "initial_balance": 500.0 },
            { "type": "loan", "name": "Car", "principal": 10000.0, "apr": 6.0, "years": 5 },
            {
                "type": "peer_to_peer",
                "name": "Investment",
                "initial_balance": 2000.0,
                "per_investment": 25.0,
                "distributions": {
                    "rate": { "alpha": 3.0, "beta": 8.0 },
                    "start": { "alpha": 3.0, "beta": 5.0 },
                    "pay_day": { "alpha": 20.0, "beta": 20.0 }
                }
            }
        ],
        "line_items": [
            { "type": "loan_payment", "from": "Checking", "to": "Car", "day_of_month": 5 },
            {
                "type": "daily_random_transaction",
                "account": "Checking",
                "name": "Restaurant",
                "kind": "WITHDRAWAL",
                "base_amount": 25.0,
                "max_amount": 60.0,
                "beta": { "alpha": 1.0, "beta": 4.0 },
                "odds": { "friday": 0.6, "saturday": 0.5 }
            }
        ]
    }"#;
    let config: SimulationConfig = serde_json::from_str(json).unwrap();
    config.validate().unwrap();

    assert_eq!(config.days(), 31);
    assert_eq!(
        config.accounts[1],
        AccountConfig::Loan {
            name: "Car".into(),
            principal: Usd::dollars(10_000),
            apr: 6.0,
            years: 5,
            payments_made: 0,
        }
    );
    match &config.accounts[2] {
        AccountConfig::PeerToPeer { distributions, .. } => {
            assert_eq!(*distributions, Default::default());
        }
        other => panic!("expected a peer-to-peer account, got {other:?}"),
    }

    let round_trip: SimulationConfig =
        serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(round_trip, config);
}
