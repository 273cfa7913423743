use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::money::Usd;

/// Direction of a posting; amounts themselves are never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    /// Repayment received on a micro-loan
    MonthlyPayment,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAWAL",
            TransactionKind::MonthlyPayment => "MONTHLY_PAYMENT",
        };
        f.write_str(name)
    }
}

/// A posted ledger entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub date: Date,
    pub kind: TransactionKind,
    pub description: String,
    pub amount: Usd,
}

impl Transaction {
    pub fn new(date: Date, kind: TransactionKind, description: impl Into<String>, amount: Usd) -> Self {
        Self {
            date,
            kind,
            description: description.into(),
            amount,
        }
    }

    pub fn deposit(date: Date, description: impl Into<String>, amount: Usd) -> Self {
        Self::new(date, TransactionKind::Deposit, description, amount)
    }

    pub fn withdrawal(date: Date, description: impl Into<String>, amount: Usd) -> Self {
        Self::new(date, TransactionKind::Withdrawal, description, amount)
    }

    /// Contribution of this entry to a running balance.
    pub fn signed_amount(&self) -> Usd {
        match self.kind {
            TransactionKind::Withdrawal => -self.amount,
            TransactionKind::Deposit | TransactionKind::MonthlyPayment => self.amount,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} - {}",
            self.date.strftime("%Y/%m/%d"),
            self.kind,
            self.description,
            self.amount
        )
    }
}
