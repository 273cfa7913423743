//! Tests for scheduled line items
//!
//! These tests verify:
//! - Monthly items fire only on their day of the month and inside their window
//! - One-time postings fire once
//! - Daily random postings follow the weekday odds and the Beta draw
//! - Loan payments transfer the scheduled installment into the loan

use jiff::civil::{Date, date};

use super::FixedDraws;
use crate::bank::Bank;
use crate::date_generator::DateRange;
use crate::error::BankError;
use crate::model::{
    Account, BankAccount, LineItem, LoanAccount, TransactionKind, WeekdayOdds,
};
use crate::money::Usd;
use crate::process::Context;
use crate::random::BetaDistribution;

fn checking_bank(initial: Usd) -> Bank {
    let mut bank = Bank::new(FixedDraws {
        uniform: 0.0,
        beta: 0.5,
    });
    bank.add_account(BankAccount::new("Checking", date(2018, 1, 1), initial))
        .unwrap();
    bank
}

fn run(bank: &mut Bank, start: Date, end: Date) {
    let mut ctx = Context::new();
    for d in DateRange::new(start, end) {
        bank.handle_date(d, &mut ctx);
    }
}

fn posting_dates(bank: &Bank, name: &str) -> Vec<Date> {
    bank.account(name)
        .map(Account::ledger)
        .unwrap()
        .iter()
        .skip(1)
        .map(|tx| tx.date)
        .collect()
}

#[test]
fn test_day_31_only_in_long_months() {
    let mut bank = checking_bank(Usd::ZERO);
    bank.add_line_item(LineItem::monthly_deposit("Checking", "Bonus", Usd::dollars(10), 31));

    run(&mut bank, date(2018, 1, 1), date(2018, 12, 31));

    let months: Vec<i8> = posting_dates(&bank, "Checking")
        .iter()
        .map(|d| d.month())
        .collect();
    assert_eq!(months, [1, 3, 5, 7, 8, 10, 12]);
    assert_eq!(
        bank.account("Checking").unwrap().current_balance(),
        Usd::dollars(70)
    );
}

#[test]
fn test_monthly_window() {
    let mut bank = checking_bank(Usd::ZERO);
    bank.add_line_item(
        LineItem::monthly_deposit("Checking", "Contract", Usd::dollars(1_000), 15)
            .between(date(2018, 3, 15), date(2018, 6, 14)),
    );

    run(&mut bank, date(2018, 1, 1), date(2018, 12, 31));

    assert_eq!(
        posting_dates(&bank, "Checking"),
        [date(2018, 3, 15), date(2018, 4, 15), date(2018, 5, 15)]
    );
}

#[test]
fn test_monthly_transfer() {
    let mut bank = checking_bank(Usd::dollars(5_000));
    bank.add_account(BankAccount::new("Savings", date(2018, 1, 1), Usd::ZERO))
        .unwrap();
    bank.add_line_item(LineItem::monthly_transfer("Checking", "Savings", Usd::dollars(2_000), 2));

    run(&mut bank, date(2018, 1, 1), date(2018, 3, 31));

    // The third transfer exceeds the remaining balance
    assert_eq!(
        bank.account("Savings").unwrap().current_balance(),
        Usd::dollars(4_000)
    );
    assert_eq!(
        bank.account("Checking").unwrap().current_balance(),
        Usd::dollars(1_000)
    );
}

#[test]
fn test_one_time_posting() {
    let mut bank = checking_bank(Usd::dollars(100));
    bank.add_line_item(LineItem::one_time(
        "Checking",
        "Tax refund",
        TransactionKind::Deposit,
        Usd::dollars(800),
        date(2018, 4, 20),
    ));

    run(&mut bank, date(2018, 1, 1), date(2018, 12, 31));

    assert_eq!(posting_dates(&bank, "Checking"), [date(2018, 4, 20)]);
}

#[test]
fn test_daily_random_follows_weekday_odds() {
    let mut bank = checking_bank(Usd::dollars(500));
    let odds = WeekdayOdds {
        saturday: 1.0,
        ..WeekdayOdds::default()
    };
    bank.add_line_item(LineItem::daily_random(
        "Checking",
        "Restaurant",
        TransactionKind::Withdrawal,
        Usd::dollars(25),
        Usd::dollars(60),
        BetaDistribution::new(1.0, 4.0).unwrap(),
        odds,
    ));

    // Two full weeks
    run(&mut bank, date(2018, 1, 1), date(2018, 1, 14));

    assert_eq!(
        posting_dates(&bank, "Checking"),
        [date(2018, 1, 6), date(2018, 1, 13)]
    );
    let ledger = bank.account("Checking").unwrap().ledger();
    assert!(ledger[1..].iter().all(|tx| tx.amount == Usd::from_cents(42_50)));
    assert_eq!(
        bank.account("Checking").unwrap().current_balance(),
        Usd::dollars(415)
    );
}

#[test]
fn test_daily_random_never_fires_at_zero_odds() {
    let mut bank = checking_bank(Usd::dollars(500));
    bank.add_line_item(
        LineItem::daily_random(
            "Checking",
            "Coffee",
            TransactionKind::Withdrawal,
            Usd::dollars(3),
            Usd::dollars(6),
            BetaDistribution::new(2.0, 2.0).unwrap(),
            WeekdayOdds::every_day(0.0),
        )
        .between(date(2018, 1, 1), date(2018, 1, 31)),
    );

    run(&mut bank, date(2018, 1, 1), date(2018, 1, 31));

    assert!(posting_dates(&bank, "Checking").is_empty());
}

#[test]
fn test_loan_payment_line_item() {
    let mut bank = checking_bank(Usd::dollars(1_000));
    bank.add_account(LoanAccount::new("Car", Usd::dollars(10_000), 6.0, 5, 0))
        .unwrap();
    bank.add_line_item(LineItem::loan_payment("Checking", "Car", 5));

    run(&mut bank, date(2018, 1, 1), date(2018, 2, 28));

    let loan = bank.account("Car").unwrap().as_loan().unwrap();
    assert_eq!(loan.months_paid, 2);
    assert_eq!(
        bank.account("Checking").unwrap().current_balance(),
        Usd::dollars(1_000) - Usd::from_cents(193_33) * 2
    );
}

#[test]
fn test_loan_payment_requires_loan_account() {
    let mut bank = checking_bank(Usd::dollars(1_000));
    bank.add_account(BankAccount::new("Savings", date(2018, 1, 1), Usd::ZERO))
        .unwrap();

    let item = LineItem::loan_payment("Checking", "Savings", 5);
    assert_eq!(
        item.process(date(2018, 1, 5), &mut bank),
        Err(BankError::InvalidTransfer)
    );
    let missing = LineItem::loan_payment("Checking", "Boat", 5);
    assert_eq!(
        missing.process(date(2018, 1, 5), &mut bank),
        Err(BankError::AccountDoesNotExist("Boat".into()))
    );
    // Other days are ignored entirely
    assert_eq!(missing.process(date(2018, 1, 6), &mut bank), Ok(()));
}

#[test]
fn test_line_item_json() {
    let json = r#"{
        "type": "monthly_transaction",
        "account": "Checking",
        "name": "Salary",
        "kind": "DEPOSIT",
        "amount": 7000.0,
        "day_of_month": 1
    }"#;
    let item: LineItem = serde_json::from_str(json).unwrap();

    assert_eq!(
        item,
        LineItem::monthly_deposit("Checking", "Salary", Usd::dollars(7_000), 1)
    );
    assert_eq!(item.accounts(), ["Checking"]);
    assert_eq!(item.describe(), format!("{:>20}\t$7,000.00", "Salary"));
}
