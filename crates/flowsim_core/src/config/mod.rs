//! Simulation configuration
//!
//! [`SimulationConfig`] holds everything needed to run a simulation: the date
//! range, the seed of the random source, the initial accounts and the ordered
//! line items. It can be deserialized from JSON or assembled with
//! [`SimulationBuilder`].

use std::collections::HashSet;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::bank::Bank;
use crate::date_math::days_inclusive;
use crate::error::ConfigError;
use crate::model::{
    Account, BankAccount, LendingDistributions, LineItem, LoanAccount, PeerToPeerAccount,
};
use crate::money::Usd;

pub mod builder;

pub use builder::SimulationBuilder;

fn default_start_date() -> Date {
    jiff::civil::date(2018, 1, 1)
}

/// Initial state of one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountConfig {
    Basic {
        name: String,
        initial_balance: Usd,
    },
    Loan {
        name: String,
        principal: Usd,
        /// Annual percentage rate, e.g. `6.0`
        apr: f64,
        years: u32,
        #[serde(default)]
        payments_made: u32,
    },
    PeerToPeer {
        name: String,
        initial_balance: Usd,
        per_investment: Usd,
        #[serde(default)]
        distributions: LendingDistributions,
    },
}

impl AccountConfig {
    pub fn name(&self) -> &str {
        match self {
            AccountConfig::Basic { name, .. }
            | AccountConfig::Loan { name, .. }
            | AccountConfig::PeerToPeer { name, .. } => name,
        }
    }

    /// Open the account on `date`.
    pub fn open(&self, date: Date) -> Account {
        match self {
            AccountConfig::Basic {
                name,
                initial_balance,
            } => BankAccount::new(name.clone(), date, *initial_balance).into(),
            AccountConfig::Loan {
                name,
                principal,
                apr,
                years,
                payments_made,
            } => LoanAccount::new(name.clone(), *principal, *apr, *years, *payments_made).into(),
            AccountConfig::PeerToPeer {
                name,
                initial_balance,
                per_investment,
                distributions,
            } => PeerToPeerAccount::new(
                name.clone(),
                date,
                *initial_balance,
                *per_investment,
                distributions.clone(),
            )
            .into(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            AccountConfig::Loan { name, years, .. } if *years == 0 => {
                Err(ConfigError::InvalidLoanTerm(name.clone()))
            }
            AccountConfig::PeerToPeer {
                name,
                per_investment,
                ..
            } if !per_investment.is_positive() => {
                Err(ConfigError::InvalidInvestmentSize(name.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// First simulated day
    #[serde(default = "default_start_date")]
    pub start_date: Date,
    /// Last simulated day, inclusive
    pub end_date: Date,
    /// Seed of the run's random source
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
    /// Processed in order on every simulated day
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: jiff::civil::date(2018, 12, 31),
            seed: 0,
            accounts: Vec::new(),
            line_items: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Number of simulated days.
    pub fn days(&self) -> usize {
        days_inclusive(self.start_date, self.end_date)
    }

    /// A copy of this configuration drawing from a different seed.
    #[must_use]
    pub fn with_seed(&self, seed: u64) -> Self {
        Self {
            seed,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_date > self.end_date {
            return Err(ConfigError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }

        let mut names = HashSet::new();
        for account in &self.accounts {
            if !names.insert(account.name()) {
                return Err(ConfigError::DuplicateAccount(account.name().to_string()));
            }
            account.validate()?;
        }

        for item in &self.line_items {
            for account in item.accounts() {
                if !names.contains(account) {
                    return Err(ConfigError::UnknownAccount {
                        line_item: item.describe().trim().to_string(),
                        account: account.to_string(),
                    });
                }
            }
            if let LineItem::DailyRandomTransaction(random) = item {
                if let Some(p) = random.odds.iter().find(|p| !(0.0..=1.0).contains(p)) {
                    return Err(ConfigError::InvalidProbability(p));
                }
            }
        }
        Ok(())
    }

    /// Validate and open every account in a freshly seeded bank.
    pub fn build_bank(&self) -> Result<Bank, ConfigError> {
        self.validate()?;
        let mut bank = Bank::with_seed(self.seed);
        for account in &self.accounts {
            bank.add_account(account.open(self.start_date))
                .map_err(|_| ConfigError::DuplicateAccount(account.name().to_string()))?;
        }
        for item in &self.line_items {
            bank.add_line_item(item.clone());
        }
        Ok(bank)
    }
}
