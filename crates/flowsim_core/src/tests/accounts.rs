//! Tests for basic account postings
//!
//! These tests verify:
//! - Deposits and withdrawals update the balance and the ledger
//! - The balance always equals the signed sum of the ledger
//! - Validation rejects a withdrawal of the exact balance

use jiff::civil::date;

use crate::error::BankError;
use crate::model::{Account, BankAccount, Transaction, TransactionKind};
use crate::money::Usd;

fn ledger_sum(account: &Account) -> Usd {
    account.ledger().iter().map(Transaction::signed_amount).sum()
}

#[test]
fn test_deposit_then_withdraw() {
    let d = date(2018, 1, 1);
    let mut account = BankAccount::new("Checking", d, Usd::dollars(500));

    account
        .append(Transaction::deposit(d, "Paycheck", Usd::dollars(100)))
        .unwrap();
    account
        .append(Transaction::withdrawal(d, "Groceries", Usd::dollars(50)))
        .unwrap();

    assert_eq!(account.balance, Usd::dollars(550));
    assert_eq!(account.ledger.len(), 3);
    assert_eq!(account.ledger[0].description, "Initial deposit");
}

#[test]
fn test_insufficient_funds_leaves_ledger_unchanged() {
    let d = date(2018, 1, 1);
    let mut account = BankAccount::new("Checking", d, Usd::dollars(10));

    let err = account
        .append(Transaction::withdrawal(d, "Rent", Usd::dollars(20)))
        .unwrap_err();

    assert_eq!(err, BankError::InsufficientFunds);
    assert_eq!(account.balance, Usd::dollars(10));
    assert_eq!(account.ledger.len(), 1);
}

#[test]
fn test_monthly_payment_rejected_by_basic_account() {
    let d = date(2018, 1, 1);
    let mut account = BankAccount::new("Checking", d, Usd::dollars(10));
    let tx = Transaction::new(d, TransactionKind::MonthlyPayment, "Loan", Usd::dollars(1));

    assert!(!account.validate(&tx));
    assert_eq!(
        account.append(tx),
        Err(BankError::UnknownTransactionType(TransactionKind::MonthlyPayment))
    );
}

#[test]
fn test_exact_balance_withdrawal() {
    let d = date(2018, 1, 1);
    let mut account = BankAccount::new("Checking", d, Usd::dollars(100));
    let exact = Transaction::withdrawal(d, "Everything", Usd::dollars(100));

    // Validation is strict while append is not
    assert!(!account.validate(&exact));
    assert!(account.validate(&Transaction::withdrawal(d, "Most", Usd::dollars(99))));
    account.append(exact).unwrap();
    assert_eq!(account.balance, Usd::ZERO);
}

#[test]
fn test_balance_matches_ledger_sum() {
    let d = date(2018, 3, 1);
    let mut account = Account::from(BankAccount::new("Savings", d, Usd::dollars(250)));

    let postings = [
        Transaction::deposit(d, "Bonus", Usd::from_cents(123_45)),
        Transaction::withdrawal(d, "Phone", Usd::from_cents(65_00)),
        Transaction::withdrawal(d, "Too much", Usd::dollars(10_000)),
        Transaction::deposit(d, "Refund", Usd::from_cents(9_99)),
        Transaction::withdrawal(d, "Water", Usd::from_cents(48_10)),
    ];
    for tx in postings {
        // The failing withdrawal must not touch the ledger
        let _ = account.append(tx);
        assert_eq!(account.current_balance(), ledger_sum(&account));
    }

    assert_eq!(account.current_balance(), Usd::from_cents(270_34));
    assert_eq!(account.ledger().len(), 5);
}

#[test]
fn test_account_display() {
    let account = BankAccount::new("Checking", date(2018, 1, 1), Usd::from_cents(1_234_56));
    assert_eq!(account.to_string(), "Checking\t$1,234.56");
    assert_eq!(Account::from(account).name(), "Checking");
}
