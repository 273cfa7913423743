//! Borrower side of a fixed-rate amortizing loan

use std::fmt;

use tracing::debug;

use super::transaction::{Transaction, TransactionKind};
use crate::error::{BankError, Result};
use crate::money::Usd;

#[derive(Debug, Clone, PartialEq)]
pub struct LoanAccount {
    pub name: String,
    pub loan_amount: Usd,
    /// Annual percentage rate, e.g. `6.0` for 6%
    pub interest_rate: f64,
    pub monthly_interest_rate: f64,
    pub periods: u32,
    pub monthly_payment: Usd,
    pub remaining_balance: Usd,
    pub principal_paid: Usd,
    pub interest_paid: Usd,
    /// Number of payments received so far
    pub months_paid: u32,
    pub ledger: Vec<Transaction>,
}

impl LoanAccount {
    /// Create a loan of `principal` at `apr` percent over `years`, with
    /// `payments` monthly payments already made.
    pub fn new(name: impl Into<String>, principal: Usd, apr: f64, years: u32, payments: u32) -> Self {
        let periods = years * 12;
        let r = apr / 100.0 / 12.0;
        let p = principal.as_dollars();
        let c = if r == 0.0 {
            p / periods.max(1) as f64
        } else {
            r * p / (1.0 - (1.0 + r).powi(-(periods as i32)))
        };
        let monthly_payment = Usd::round_from_dollars(c);

        let mut loan = Self {
            name: name.into(),
            loan_amount: principal,
            interest_rate: apr,
            monthly_interest_rate: r,
            periods,
            monthly_payment,
            remaining_balance: monthly_payment * periods as i64,
            principal_paid: Usd::ZERO,
            interest_paid: Usd::ZERO,
            months_paid: 0,
            ledger: Vec::new(),
        };

        let payments = payments.min(periods);
        if payments > 0 {
            loan.remaining_balance -= monthly_payment * payments as i64;
            loan.months_paid = payments;
            let (interest, principal) = loan.cumulative(payments);
            loan.interest_paid = interest;
            loan.principal_paid = principal;
        }
        debug!(loan = %loan.name, payment = %loan.monthly_payment, remaining = %loan.remaining_balance, "loan opened");
        loan
    }

    /// Cumulative (interest, principal) after `payments` scheduled payments.
    pub fn cumulative(&self, payments: u32) -> (Usd, Usd) {
        let p = self.loan_amount.as_dollars();
        let r = self.monthly_interest_rate;
        let c = self.monthly_payment.as_dollars();
        let i = payments as f64;

        let interest = if r == 0.0 {
            0.0
        } else {
            (p * r - c) * ((1.0 + r).powf(i) - 1.0) / r + c * i
        };
        let principal = c * i - interest;
        (
            Usd::round_from_dollars(interest),
            Usd::round_from_dollars(principal),
        )
    }

    pub fn current_balance(&self) -> Usd {
        self.remaining_balance
    }

    pub fn is_paid_off(&self) -> bool {
        !self.remaining_balance.is_positive()
    }

    /// Total owed over the life of the loan, `monthly_payment * periods`.
    pub fn scheduled_total(&self) -> Usd {
        self.monthly_payment * self.periods as i64
    }

    /// Apply a payment.
    ///
    /// Within the term every deposit counts as one scheduled payment of
    /// `monthly_payment`, whatever its amount. Past the term the deposit pays
    /// down the residual balance directly.
    pub fn append(&mut self, tx: Transaction) -> Result<()> {
        debug!(account = %self.name, %tx, "append");
        if self.is_paid_off() {
            return Err(BankError::LoanPaidOff);
        }
        if tx.kind != TransactionKind::Deposit {
            return Err(BankError::UnknownTransactionType(tx.kind));
        }

        if self.months_paid < self.periods {
            self.remaining_balance -= self.monthly_payment;
            self.months_paid += 1;
            let (interest, principal) = self.cumulative(self.months_paid);
            self.interest_paid = interest;
            self.principal_paid = principal;
        } else {
            self.remaining_balance -= tx.amount;
            self.principal_paid += tx.amount;
            self.months_paid += 1;
        }
        self.ledger.push(tx);
        Ok(())
    }

    pub fn validate(&self, tx: &Transaction) -> bool {
        tx.kind == TransactionKind::Deposit
            && (self.months_paid < self.periods || self.remaining_balance.is_positive())
    }
}

impl fmt::Display for LoanAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\t{}", self.name, self.remaining_balance)?;
        writeln!(f, "\t- Loan Amount:\t\t{}", self.loan_amount)?;
        writeln!(f, "\t- Periods:\t\t{}", self.periods)?;
        writeln!(f, "\t- APR:\t\t\t{:.3}%", self.interest_rate)?;
        writeln!(f, "\t- Monthly Payment:\t{}", self.monthly_payment)?;
        writeln!(f, "\t- Principal Paid:\t{}", self.principal_paid)?;
        write!(f, "\t- Interest Paid:\t{}", self.interest_paid)
    }
}
