//! Simulation Builder
//!
//! Fluent construction of a [`SimulationConfig`], validated on `build()`.
//!
//! ```ignore
//! use flowsim_core::config::SimulationBuilder;
//! use flowsim_core::model::LineItem;
//! use flowsim_core::money::Usd;
//!
//! let config = SimulationBuilder::new()
//!     .start(2018, 1, 1)
//!     .years(5)
//!     .seed(42)
//!     .basic_account("Checking", Usd::dollars(500))
//!     .loan_account("Car", Usd::dollars(10_000), 6.0, 5)
//!     .line_item(LineItem::monthly_deposit("Checking", "Salary", Usd::dollars(7_000), 1))
//!     .line_item(LineItem::loan_payment("Checking", "Car", 5))
//!     .build()?;
//! ```

use jiff::civil::Date;

use super::{AccountConfig, SimulationConfig};
use crate::date_math::{add_days, add_months};
use crate::error::ConfigError;
use crate::model::{LendingDistributions, LineItem};
use crate::money::Usd;

/// Builder for [`SimulationConfig`]
#[derive(Debug, Clone, Default)]
pub struct SimulationBuilder {
    start_date: Option<Date>,
    end_date: Option<Date>,
    years: Option<u32>,
    seed: u64,
    accounts: Vec<AccountConfig>,
    line_items: Vec<LineItem>,
}

impl SimulationBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Basic Configuration
    // =========================================================================

    /// Set the simulation start date
    #[must_use]
    pub fn start_date(mut self, date: Date) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Set the simulation start date (convenience method)
    #[must_use]
    pub fn start(self, year: i16, month: i8, day: i8) -> Self {
        self.start_date(jiff::civil::date(year, month, day))
    }

    /// Set the last simulated day (inclusive). Overrides `years`.
    #[must_use]
    pub fn end_date(mut self, date: Date) -> Self {
        self.end_date = Some(date);
        self
    }

    #[must_use]
    pub fn end(self, year: i16, month: i8, day: i8) -> Self {
        self.end_date(jiff::civil::date(year, month, day))
    }

    /// Simulate `years` whole years from the start date
    #[must_use]
    pub fn years(mut self, years: u32) -> Self {
        self.years = Some(years);
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    #[must_use]
    pub fn account(mut self, account: AccountConfig) -> Self {
        self.accounts.push(account);
        self
    }

    #[must_use]
    pub fn basic_account(self, name: impl Into<String>, initial_balance: Usd) -> Self {
        self.account(AccountConfig::Basic {
            name: name.into(),
            initial_balance,
        })
    }

    /// Add a new loan of `principal` at `apr` percent over `years`
    #[must_use]
    pub fn loan_account(self, name: impl Into<String>, principal: Usd, apr: f64, years: u32) -> Self {
        self.account(AccountConfig::Loan {
            name: name.into(),
            principal,
            apr,
            years,
            payments_made: 0,
        })
    }

    /// Add a peer-to-peer account lending with the default distributions
    #[must_use]
    pub fn peer_to_peer_account(
        self,
        name: impl Into<String>,
        initial_balance: Usd,
        per_investment: Usd,
    ) -> Self {
        self.account(AccountConfig::PeerToPeer {
            name: name.into(),
            initial_balance,
            per_investment,
            distributions: LendingDistributions::default(),
        })
    }

    // =========================================================================
    // Line Items
    // =========================================================================

    #[must_use]
    pub fn line_item(mut self, item: LineItem) -> Self {
        self.line_items.push(item);
        self
    }

    #[must_use]
    pub fn line_items(mut self, items: impl IntoIterator<Item = LineItem>) -> Self {
        self.line_items.extend(items);
        self
    }

    // =========================================================================
    // Build
    // =========================================================================

    /// Resolve the date range and validate the configuration
    pub fn build(self) -> Result<SimulationConfig, ConfigError> {
        let defaults = SimulationConfig::default();
        let start_date = self.start_date.unwrap_or(defaults.start_date);
        let end_date = match (self.end_date, self.years) {
            (Some(end), _) => end,
            (None, Some(years)) => add_days(add_months(start_date, years as i32 * 12), -1),
            (None, None) => add_days(add_months(start_date, 12), -1),
        };

        let config = SimulationConfig {
            start_date,
            end_date,
            seed: self.seed,
            accounts: self.accounts,
            line_items: self.line_items,
        };
        config.validate()?;
        Ok(config)
    }
}
