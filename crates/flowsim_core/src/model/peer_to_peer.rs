//! Peer-to-peer lending account
//!
//! The account continuously lends its idle cash out as small 36-month loans.
//! Each loan repays a constant principal and a constant, precomputed interest
//! installment on a randomly drawn pay day, and occasionally charges off.
//!
//! At the end of every tick the totals satisfy:
//! - `account_value = deposits - withdrawals + interest`
//! - `available_cash + outstanding_principal = account_value`

use std::collections::BTreeMap;
use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::account_info::AccountInfo;
use super::transaction::{Transaction, TransactionKind};
use crate::date_math::{add_days, add_months, roll_to_business_day};
use crate::error::{BankError, Result};
use crate::money::Usd;
use crate::process::{Context, Message};
use crate::random::{BetaDistribution, RandomSource};

/// Most loans originated by one account in a single day
pub const DAILY_ORIGINATION_LIMIT: usize = 85;
/// Term of every micro-loan, in months
pub const LOAN_TERM_MONTHS: i64 = 36;
/// Probability that a due payment turns into a charge-off
pub const CHARGE_OFF_PROBABILITY: f64 = 0.005;

const TERM_YEARS: f64 = 3.0;
const BASE_ANNUAL_RATE: f64 = 1.08;
const ANNUAL_RATE_SPREAD: f64 = 0.12;
const START_WINDOW_DAYS: i32 = 7;
const PAY_WINDOW_DAYS: f64 = 60.0;

/// Distributions driving loan origination and repayment timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LendingDistributions {
    /// Position of the annual rate within `[1.08, 1.20]`
    pub rate: BetaDistribution,
    /// Days until a new loan starts, as a fraction of a week
    pub start: BetaDistribution,
    /// Days until the next payment, as a fraction of 60 days
    pub pay_day: BetaDistribution,
}

impl Default for LendingDistributions {
    fn default() -> Self {
        Self {
            rate: BetaDistribution::new(3.0, 8.0).expect("valid beta parameters"),
            start: BetaDistribution::new(3.0, 5.0).expect("valid beta parameters"),
            pay_day: BetaDistribution::new(20.0, 20.0).expect("valid beta parameters"),
        }
    }
}

/// Move `date` forward by one day plus `⌊draw * max_days⌋` days, then off the weekend.
pub fn random_future_business_day(date: Date, draw: f64, max_days: i32) -> Date {
    let offset = 1 + (draw * max_days as f64) as i32;
    roll_to_business_day(add_days(date, offset))
}

/// A single loan held by a [`PeerToPeerAccount`]
#[derive(Debug, Clone, PartialEq)]
pub struct MicroLoan {
    /// Origination index within the owning account
    pub id: usize,
    pub start_date: Date,
    pub due_date: Date,
    pub pay_day: Date,
    /// Growth factor over the whole term, `annual_rate^3`
    pub total_rate: f64,
    pub monthly_principal: Usd,
    pub monthly_interest: Usd,
    pub outstanding_principal: Usd,
    pub total_paid: Usd,
}

impl MicroLoan {
    pub fn is_settled(&self) -> bool {
        !self.outstanding_principal.is_positive()
    }

    // The last payment absorbs the remainder left by truncating the installment.
    fn next_principal(&self) -> Usd {
        let after = self.outstanding_principal - self.monthly_principal;
        if !self.monthly_principal.is_positive() || after < self.monthly_principal {
            self.outstanding_principal
        } else {
            self.monthly_principal
        }
    }

    /// Collect this loan's payment if it falls due on `date`.
    pub fn process(
        &mut self,
        date: Date,
        account: &mut PeerToPeerAccount,
        rng: &mut dyn RandomSource,
    ) -> Result<()> {
        if self.is_settled() || self.pay_day != date {
            return Ok(());
        }

        if rng.uniform() < CHARGE_OFF_PROBABILITY {
            return self.charge_off(date, account);
        }

        let principal = self.next_principal();
        let payment = principal + self.monthly_interest;
        account.append(Transaction::new(
            date,
            TransactionKind::MonthlyPayment,
            format!("Payment on loan #{}", self.id),
            payment,
        ))?;
        self.total_paid += payment;
        self.outstanding_principal -= principal;
        account.credit(principal, self.monthly_interest);
        account.record_cashflow(payment, self.monthly_interest);

        self.due_date = add_months(date, 1);
        let offset = ((rng.beta(&account.distributions.pay_day) * PAY_WINDOW_DAYS) as i32).max(1);
        self.pay_day = add_days(date, offset);
        Ok(())
    }

    /// Recover the outstanding principal plus one interest installment and
    /// close the loan.
    fn charge_off(&mut self, date: Date, account: &mut PeerToPeerAccount) -> Result<()> {
        let residual = self.outstanding_principal;
        account.append(Transaction::new(
            date,
            TransactionKind::MonthlyPayment,
            format!("Charge-off for loan #{}", self.id),
            residual,
        ))?;
        account.credit(residual, self.monthly_interest);
        account.record_cashflow(self.monthly_principal + self.monthly_interest, self.monthly_interest);
        self.total_paid += residual + self.monthly_interest;
        self.outstanding_principal = Usd::ZERO;
        debug!(account = %account.name, loan = self.id, %residual, "loan charged off");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct PeerToPeerAccount {
    pub name: String,
    pub account_value: Usd,
    pub per_investment: Usd,
    pub available_cash: Usd,
    pub deposits: Usd,
    pub withdrawals: Usd,
    pub invested: Usd,
    pub interest: Usd,
    pub outstanding_principal: Usd,
    pub monthly_cashflow: Usd,
    pub monthly_interest: Usd,
    pub daily_cashflow: Usd,
    pub daily_interest: Usd,
    pub ledger: Vec<Transaction>,
    pub loans: Vec<MicroLoan>,
    pub distributions: LendingDistributions,
    /// Pay day -> ids of the loans due that day
    schedule: BTreeMap<Date, Vec<usize>>,
}

impl PeerToPeerAccount {
    pub fn new(
        name: impl Into<String>,
        date: Date,
        initial: Usd,
        per_investment: Usd,
        distributions: LendingDistributions,
    ) -> Self {
        Self {
            name: name.into(),
            account_value: initial,
            per_investment,
            available_cash: initial,
            deposits: initial,
            withdrawals: Usd::ZERO,
            invested: Usd::ZERO,
            interest: Usd::ZERO,
            outstanding_principal: Usd::ZERO,
            monthly_cashflow: Usd::ZERO,
            monthly_interest: Usd::ZERO,
            daily_cashflow: Usd::ZERO,
            daily_interest: Usd::ZERO,
            ledger: vec![Transaction::deposit(date, "Initial deposit", initial)],
            loans: Vec::new(),
            distributions,
            schedule: BTreeMap::new(),
        }
    }

    pub fn current_balance(&self) -> Usd {
        self.available_cash
    }

    pub fn active_loans(&self) -> usize {
        self.loans.iter().filter(|loan| !loan.is_settled()).count()
    }

    pub fn append(&mut self, tx: Transaction) -> Result<()> {
        match tx.kind {
            TransactionKind::Deposit => {
                self.account_value += tx.amount;
                self.available_cash += tx.amount;
                self.deposits += tx.amount;
            }
            TransactionKind::Withdrawal => {
                if tx.amount > self.available_cash {
                    return Err(BankError::InsufficientFunds);
                }
                self.available_cash -= tx.amount;
                self.account_value -= tx.amount;
                self.withdrawals += tx.amount;
            }
            // Totals are adjusted by the loan that produced the payment
            TransactionKind::MonthlyPayment => {}
        }
        self.ledger.push(tx);
        Ok(())
    }

    pub fn validate(&self, tx: &Transaction) -> bool {
        match tx.kind {
            TransactionKind::Deposit => true,
            TransactionKind::Withdrawal => self.available_cash > tx.amount,
            TransactionKind::MonthlyPayment => false,
        }
    }

    fn credit(&mut self, principal: Usd, interest: Usd) {
        self.interest += interest;
        self.account_value += interest;
        self.available_cash += principal + interest;
        self.outstanding_principal -= principal;
    }

    /// Charge-offs report one scheduled installment, not the recovered amount.
    fn record_cashflow(&mut self, cash: Usd, interest: Usd) {
        self.monthly_cashflow += cash;
        self.monthly_interest += interest;
        self.daily_cashflow += cash;
        self.daily_interest += interest;
    }

    /// Daily tick: report, lend idle cash, collect due payments, resize.
    pub fn update(&mut self, date: Date, rng: &mut dyn RandomSource, ctx: &mut Context) {
        self.broadcast_monthly(date, ctx);
        self.broadcast_daily(date, ctx);

        self.originate(date, rng);

        let starting_value = self.account_value;
        self.collect_payments(date, rng);
        if self.account_value - starting_value > self.per_investment * 4 {
            self.per_investment = self.per_investment * 2;
            debug!(account = %self.name, per_investment = %self.per_investment, "investment size doubled");
        }
    }

    fn snapshot(&self, date: Date, cash_flow: Usd, interest: Usd) -> AccountInfo {
        AccountInfo {
            date,
            available_cash: self.available_cash,
            account_value: self.account_value,
            cash_flow,
            interest,
        }
    }

    fn broadcast_monthly(&mut self, date: Date, ctx: &mut Context) {
        if date.day() != 1 {
            return;
        }
        let info = self.snapshot(date, self.monthly_cashflow, self.monthly_interest);
        ctx.dispatch(Message::monthly_account_info(info));
        debug!(
            account = %self.name,
            date = %date,
            value = %self.account_value,
            cashflow = %self.monthly_cashflow,
            interest = %self.monthly_interest,
            loans = self.loans.len(),
            "monthly snapshot"
        );
        self.monthly_cashflow = Usd::ZERO;
        self.monthly_interest = Usd::ZERO;
    }

    fn broadcast_daily(&mut self, date: Date, ctx: &mut Context) {
        let info = self.snapshot(date, self.daily_cashflow, self.daily_interest);
        ctx.dispatch(Message::daily_account_info(info));
        self.daily_cashflow = Usd::ZERO;
        self.daily_interest = Usd::ZERO;
    }

    fn originate(&mut self, date: Date, rng: &mut dyn RandomSource) {
        let mut originated = 0;
        while self.available_cash > self.per_investment && originated < DAILY_ORIGINATION_LIMIT {
            let annual_rate = BASE_ANNUAL_RATE + rng.beta(&self.distributions.rate) * ANNUAL_RATE_SPREAD;
            let total_rate = annual_rate.powf(TERM_YEARS);
            let amount = self.per_investment.as_dollars();
            let monthly_principal = Usd::from_cents(self.per_investment.cents() / LOAN_TERM_MONTHS);
            let monthly_interest =
                Usd::truncate_from_dollars((amount * total_rate - amount) / LOAN_TERM_MONTHS as f64);

            let start = random_future_business_day(
                date,
                rng.beta(&self.distributions.start),
                START_WINDOW_DAYS,
            );
            let pay_day = add_days(
                start,
                (rng.beta(&self.distributions.pay_day) * PAY_WINDOW_DAYS) as i32,
            );

            let id = self.loans.len();
            self.loans.push(MicroLoan {
                id,
                start_date: start,
                due_date: add_months(start, 1),
                pay_day,
                total_rate,
                monthly_principal,
                monthly_interest,
                outstanding_principal: self.per_investment,
                total_paid: Usd::ZERO,
            });
            self.schedule.entry(pay_day).or_default().push(id);

            self.outstanding_principal += self.per_investment;
            self.available_cash -= self.per_investment;
            self.invested += self.per_investment;
            originated += 1;
        }

        if originated > 0 {
            debug!(account = %self.name, date = %date, originated, size = %self.per_investment, "loans originated");
        }
    }

    fn collect_payments(&mut self, date: Date, rng: &mut dyn RandomSource) {
        let Some(mut due) = self.schedule.remove(&date) else {
            return;
        };
        due.sort_unstable();

        let mut loans = std::mem::take(&mut self.loans);
        for id in due {
            let loan = &mut loans[id];
            if let Err(err) = loan.process(date, self, rng) {
                warn!(account = %self.name, loan = id, %err, "loan payment failed");
            }
            if !loan.is_settled() && loan.pay_day > date {
                self.schedule.entry(loan.pay_day).or_default().push(id);
            }
        }
        self.loans = loans;
    }
}

impl fmt::Display for PeerToPeerAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\t{}", self.name, self.available_cash)?;
        writeln!(f, "\t- Account Value:\t{}", self.account_value)?;
        writeln!(f, "\t- Deposits:\t\t{}", self.deposits)?;
        writeln!(f, "\t- Interest:\t\t{}", self.interest)?;
        writeln!(f, "\t- Invested:\t\t{}", self.invested)?;
        writeln!(f, "\t- Loans:\t\t{}", self.loans.len())?;
        writeln!(f, "\t- Per Loan:\t\t{}", self.per_investment)?;
        write!(f, "\t- Outstanding:\t\t{}", self.outstanding_principal)
    }
}
