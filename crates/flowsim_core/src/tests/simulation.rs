//! Tests for direct, batch and pipeline simulation runs

use jiff::civil::date;

use crate::config::{SimulationBuilder, SimulationConfig};
use crate::date_math::month_starts_inclusive;
use crate::model::{LineItem, TransactionKind, WeekdayOdds};
use crate::money::Usd;
use crate::random::BetaDistribution;
use crate::report::{HEADER, record};
use crate::simulation::{run_pipeline, simulate, simulate_batch, write_csv_reports};

fn household(seed: u64, start: jiff::civil::Date, end: jiff::civil::Date) -> SimulationConfig {
    SimulationBuilder::new()
        .start_date(start)
        .end_date(end)
        .seed(seed)
        .basic_account("Checking", Usd::dollars(500))
        .peer_to_peer_account("Investment", Usd::dollars(50_000), Usd::dollars(25))
        .line_item(LineItem::monthly_deposit("Checking", "Salary", Usd::dollars(3_500), 1))
        .line_item(LineItem::monthly_deposit("Checking", "Salary", Usd::dollars(3_500), 15))
        .line_item(LineItem::monthly_withdrawal("Checking", "Rent", Usd::dollars(1_800), 3))
        .line_item(LineItem::daily_random(
            "Checking",
            "Restaurant",
            TransactionKind::Withdrawal,
            Usd::dollars(25),
            Usd::dollars(60),
            BetaDistribution::new(1.0, 4.0).unwrap(),
            WeekdayOdds {
                friday: 0.6,
                saturday: 0.5,
                ..WeekdayOdds::every_day(0.1)
            },
        ))
        .line_item(LineItem::monthly_transfer("Checking", "Investment", Usd::dollars(2_000), 17))
        .build()
        .unwrap()
}

#[test]
fn test_row_counts() {
    let config = household(1, date(2018, 1, 1), date(2018, 12, 31));
    let result = simulate(&config).unwrap();

    assert_eq!(result.daily.len(), 365);
    assert_eq!(result.monthly.len(), 12);
    assert_eq!(
        result.monthly.len(),
        month_starts_inclusive(config.start_date, config.end_date)
    );
    assert_eq!(result.daily.first().unwrap().date, date(2018, 1, 1));
    assert_eq!(result.daily.last().unwrap().date, date(2018, 12, 31));
}

#[test]
fn test_investor_totals_balance_over_full_run() {
    let config = household(5, date(2018, 1, 1), date(2020, 6, 30));
    let result = simulate(&config).unwrap();

    let investor = result
        .bank
        .account("Investment")
        .and_then(|account| account.as_peer_to_peer())
        .unwrap();
    assert!(investor.interest.is_positive());
    assert_eq!(
        investor.account_value - investor.deposits + investor.withdrawals,
        investor.interest
    );
    assert_eq!(
        investor.available_cash + investor.outstanding_principal,
        investor.account_value
    );
    // Every monthly transfer landed
    assert_eq!(investor.deposits, Usd::dollars(50_000 + 2_000 * 30));
}

#[test]
fn test_same_seed_same_result() {
    let config = household(9, date(2018, 1, 1), date(2018, 6, 30));
    let a = simulate(&config).unwrap();
    let b = simulate(&config).unwrap();
    assert_eq!(a.daily, b.daily);
    assert_eq!(a.monthly, b.monthly);

    let other = simulate(&config.with_seed(10)).unwrap();
    assert_ne!(a.daily, other.daily);
}

#[test]
fn test_batch_runs_every_seed() {
    let config = household(0, date(2018, 1, 1), date(2018, 3, 31));
    let results = simulate_batch(&config, &[1, 2, 3]).unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(
        results.iter().map(|r| r.seed).collect::<Vec<_>>(),
        [1, 2, 3]
    );
    let single = simulate(&config.with_seed(2)).unwrap();
    assert_eq!(results[1].daily, single.daily);
}

#[tokio::test]
async fn test_pipeline_matches_direct_run() {
    let config = household(21, date(2018, 1, 1), date(2018, 3, 31));
    let output = run_pipeline(&config, Vec::<u8>::new(), Vec::<u8>::new()).await.unwrap();
    let direct = simulate(&config).unwrap();

    let daily = String::from_utf8(output.daily).unwrap();
    let mut lines = daily.lines();
    assert_eq!(lines.next(), Some(HEADER.join(",").as_str()));
    let expected: Vec<String> = direct.daily.iter().map(|info| record(info).join(",")).collect();
    assert_eq!(lines.collect::<Vec<_>>(), expected);

    let monthly = String::from_utf8(output.monthly).unwrap();
    assert_eq!(monthly.lines().count(), 1 + 3);

    let investor = output.bank.account("Investment").unwrap();
    let direct_investor = direct.bank.account("Investment").unwrap();
    assert_eq!(investor.current_balance(), direct_investor.current_balance());
}

#[tokio::test]
async fn test_csv_reports_are_byte_identical_for_same_seed() {
    let config = household(77, date(2018, 3, 1), date(2018, 3, 30));
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    write_csv_reports(&config, first.path()).await.unwrap();
    write_csv_reports(&config, second.path()).await.unwrap();
    // Running again into the same directory truncates the previous output
    write_csv_reports(&config, first.path()).await.unwrap();

    let read = |dir: &tempfile::TempDir, name: &str| std::fs::read(dir.path().join(name)).unwrap();
    let daily = read(&first, "daily.csv");
    assert_eq!(daily, read(&second, "daily.csv"));
    assert_eq!(read(&first, "monthly.csv"), read(&second, "monthly.csv"));

    let text = String::from_utf8(daily).unwrap();
    assert_eq!(text.lines().count(), 1 + 30);
    assert!(text.starts_with("date,available,value,cashflow,interest\n2018-03-01,"));
}

#[test]
fn test_invalid_config_rejected_before_running() {
    let mut config = household(1, date(2018, 1, 1), date(2018, 1, 31));
    config.end_date = date(2017, 12, 31);
    assert!(simulate(&config).is_err());
    assert!(simulate_batch(&config, &[1]).is_err());
}
