//! Scheduled cash events
//!
//! A line item is evaluated against every simulated date and posts to (or
//! transfers between) bank accounts when the date qualifies. Windowed items
//! only fire inside `[start_date, end_date]`; monthly items only fire on their
//! `day_of_month`, so a `day_of_month` of 31 skips shorter months.

use jiff::civil::{Date, Weekday};
use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionKind};
use crate::bank::Bank;
use crate::error::{BankError, Result};
use crate::money::Usd;
use crate::random::BetaDistribution;

fn unbounded_start() -> Date {
    Date::MIN
}

fn unbounded_end() -> Date {
    Date::MAX
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineItem {
    MonthlyTransaction(MonthlyTransaction),
    MonthlyTransfer(MonthlyTransfer),
    OneTimeTransaction(OneTimeTransaction),
    DailyRandomTransaction(DailyRandomTransaction),
    LoanPayment(LoanPayment),
}

/// Fixed posting on one day of every month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTransaction {
    pub account: String,
    pub name: String,
    pub kind: TransactionKind,
    pub amount: Usd,
    pub day_of_month: i8,
    #[serde(default = "unbounded_start")]
    pub start_date: Date,
    #[serde(default = "unbounded_end")]
    pub end_date: Date,
}

/// Fixed transfer between two accounts on one day of every month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTransfer {
    pub from: String,
    pub to: String,
    pub amount: Usd,
    pub day_of_month: i8,
    #[serde(default = "unbounded_start")]
    pub start_date: Date,
    #[serde(default = "unbounded_end")]
    pub end_date: Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneTimeTransaction {
    pub account: String,
    pub name: String,
    pub kind: TransactionKind,
    pub amount: Usd,
    pub date: Date,
}

/// Probability of a posting on each day of the week
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekdayOdds {
    pub monday: f64,
    pub tuesday: f64,
    pub wednesday: f64,
    pub thursday: f64,
    pub friday: f64,
    pub saturday: f64,
    pub sunday: f64,
}

impl WeekdayOdds {
    /// Same probability every day.
    pub fn every_day(p: f64) -> Self {
        Self {
            monday: p,
            tuesday: p,
            wednesday: p,
            thursday: p,
            friday: p,
            saturday: p,
            sunday: p,
        }
    }

    pub fn for_day(&self, weekday: Weekday) -> f64 {
        match weekday {
            Weekday::Monday => self.monday,
            Weekday::Tuesday => self.tuesday,
            Weekday::Wednesday => self.wednesday,
            Weekday::Thursday => self.thursday,
            Weekday::Friday => self.friday,
            Weekday::Saturday => self.saturday,
            Weekday::Sunday => self.sunday,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
        .into_iter()
    }
}

/// Posting that fires with a per-weekday probability and a Beta-distributed amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRandomTransaction {
    pub account: String,
    pub name: String,
    pub kind: TransactionKind,
    pub base_amount: Usd,
    pub max_amount: Usd,
    pub beta: BetaDistribution,
    pub odds: WeekdayOdds,
    #[serde(default = "unbounded_start")]
    pub start_date: Date,
    #[serde(default = "unbounded_end")]
    pub end_date: Date,
}

/// Monthly payment from a cash account into a loan account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPayment {
    pub from: String,
    pub to: String,
    pub day_of_month: i8,
}

impl LineItem {
    pub fn monthly(
        account: impl Into<String>,
        name: impl Into<String>,
        kind: TransactionKind,
        amount: Usd,
        day_of_month: i8,
    ) -> Self {
        LineItem::MonthlyTransaction(MonthlyTransaction {
            account: account.into(),
            name: name.into(),
            kind,
            amount,
            day_of_month,
            start_date: Date::MIN,
            end_date: Date::MAX,
        })
    }

    pub fn monthly_deposit(
        account: impl Into<String>,
        name: impl Into<String>,
        amount: Usd,
        day_of_month: i8,
    ) -> Self {
        Self::monthly(account, name, TransactionKind::Deposit, amount, day_of_month)
    }

    pub fn monthly_withdrawal(
        account: impl Into<String>,
        name: impl Into<String>,
        amount: Usd,
        day_of_month: i8,
    ) -> Self {
        Self::monthly(account, name, TransactionKind::Withdrawal, amount, day_of_month)
    }

    pub fn monthly_transfer(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: Usd,
        day_of_month: i8,
    ) -> Self {
        LineItem::MonthlyTransfer(MonthlyTransfer {
            from: from.into(),
            to: to.into(),
            amount,
            day_of_month,
            start_date: Date::MIN,
            end_date: Date::MAX,
        })
    }

    pub fn one_time(
        account: impl Into<String>,
        name: impl Into<String>,
        kind: TransactionKind,
        amount: Usd,
        date: Date,
    ) -> Self {
        LineItem::OneTimeTransaction(OneTimeTransaction {
            account: account.into(),
            name: name.into(),
            kind,
            amount,
            date,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn daily_random(
        account: impl Into<String>,
        name: impl Into<String>,
        kind: TransactionKind,
        base_amount: Usd,
        max_amount: Usd,
        beta: BetaDistribution,
        odds: WeekdayOdds,
    ) -> Self {
        LineItem::DailyRandomTransaction(DailyRandomTransaction {
            account: account.into(),
            name: name.into(),
            kind,
            base_amount,
            max_amount,
            beta,
            odds,
            start_date: Date::MIN,
            end_date: Date::MAX,
        })
    }

    pub fn loan_payment(from: impl Into<String>, to: impl Into<String>, day_of_month: i8) -> Self {
        LineItem::LoanPayment(LoanPayment {
            from: from.into(),
            to: to.into(),
            day_of_month,
        })
    }

    /// Restrict a windowed item to `[start, end]`. No effect on one-time
    /// postings and loan payments.
    #[must_use]
    pub fn between(mut self, start: Date, end: Date) -> Self {
        match &mut self {
            LineItem::MonthlyTransaction(item) => {
                item.start_date = start;
                item.end_date = end;
            }
            LineItem::MonthlyTransfer(item) => {
                item.start_date = start;
                item.end_date = end;
            }
            LineItem::DailyRandomTransaction(item) => {
                item.start_date = start;
                item.end_date = end;
            }
            LineItem::OneTimeTransaction(_) | LineItem::LoanPayment(_) => {}
        }
        self
    }

    /// Names of every account this item posts to or draws from.
    pub fn accounts(&self) -> Vec<&str> {
        match self {
            LineItem::MonthlyTransaction(item) => vec![&item.account],
            LineItem::MonthlyTransfer(item) => vec![&item.from, &item.to],
            LineItem::OneTimeTransaction(item) => vec![&item.account],
            LineItem::DailyRandomTransaction(item) => vec![&item.account],
            LineItem::LoanPayment(item) => vec![&item.from, &item.to],
        }
    }

    pub fn describe(&self) -> String {
        match self {
            LineItem::MonthlyTransaction(item) => format!("{:>20}\t{}", item.name, item.amount),
            LineItem::MonthlyTransfer(item) => {
                format!("TRANSFER {} to {}\t{}", item.from, item.to, item.amount)
            }
            LineItem::OneTimeTransaction(item) => format!("{:>20}\t{}", item.name, item.amount),
            LineItem::DailyRandomTransaction(item) => format!(
                "{:>20}\t{} - {}",
                item.name, item.base_amount, item.max_amount
            ),
            LineItem::LoanPayment(item) => format!("LOAN PAYMENT {} to {}", item.from, item.to),
        }
    }

    /// Apply this item to `bank` for `date`.
    pub fn process(&self, date: Date, bank: &mut Bank) -> Result<()> {
        match self {
            LineItem::MonthlyTransaction(item) => item.process(date, bank),
            LineItem::MonthlyTransfer(item) => item.process(date, bank),
            LineItem::OneTimeTransaction(item) => item.process(date, bank),
            LineItem::DailyRandomTransaction(item) => item.process(date, bank),
            LineItem::LoanPayment(item) => item.process(date, bank),
        }
    }
}

impl MonthlyTransaction {
    fn process(&self, date: Date, bank: &mut Bank) -> Result<()> {
        if date > self.end_date || date < self.start_date || date.day() != self.day_of_month {
            return Ok(());
        }
        bank.append(
            &self.account,
            Transaction::new(date, self.kind, self.name.clone(), self.amount),
        )
    }
}

impl MonthlyTransfer {
    fn process(&self, date: Date, bank: &mut Bank) -> Result<()> {
        if date > self.end_date || date < self.start_date || date.day() != self.day_of_month {
            return Ok(());
        }
        bank.transfer(date, &self.from, &self.to, self.amount)
    }
}

impl OneTimeTransaction {
    fn process(&self, date: Date, bank: &mut Bank) -> Result<()> {
        if date != self.date {
            return Ok(());
        }
        bank.append(
            &self.account,
            Transaction::new(date, self.kind, self.name.clone(), self.amount),
        )
    }
}

impl DailyRandomTransaction {
    fn process(&self, date: Date, bank: &mut Bank) -> Result<()> {
        if date > self.end_date || date < self.start_date {
            return Ok(());
        }
        let p = self.odds.for_day(date.weekday());
        if p <= 0.0 || bank.rng().uniform() >= p {
            return Ok(());
        }

        let draw = bank.rng().beta(&self.beta);
        let spread = (self.max_amount - self.base_amount).cents() as f64;
        let amount = self.base_amount + Usd::from_cents((draw * spread) as i64);
        bank.append(
            &self.account,
            Transaction::new(date, self.kind, self.name.clone(), amount),
        )
    }
}

impl LoanPayment {
    fn process(&self, date: Date, bank: &mut Bank) -> Result<()> {
        if date.day() != self.day_of_month {
            return Ok(());
        }

        let loan = bank
            .account(&self.to)
            .ok_or_else(|| BankError::AccountDoesNotExist(self.to.clone()))?
            .as_loan()
            .ok_or(BankError::InvalidTransfer)?;

        let amount = if loan.months_paid >= loan.periods && loan.remaining_balance.is_positive() {
            loan.remaining_balance
        } else if loan.months_paid < loan.periods {
            loan.monthly_payment
        } else {
            return Ok(());
        };
        bank.transfer(date, &self.from, &self.to, amount)
    }
}
