//! Deterministic personal-cashflow simulation library
//!
//! This crate advances a virtual calendar one day at a time over a set of
//! accounts and scheduled cash events, and reports available cash, account
//! value, cash flow and interest. It supports:
//! - Basic checking accounts, amortizing loans and peer-to-peer lending accounts
//! - Scheduled line items (monthly postings and transfers, one-time and random daily postings)
//! - A message-passing process runtime that streams dates into the bank and reports
//! - Seeded randomness for reproducible runs
//!
//! # Builder DSL
//!
//! ```ignore
//! use flowsim_core::config::SimulationBuilder;
//! use flowsim_core::model::LineItem;
//! use flowsim_core::money::Usd;
//!
//! let config = SimulationBuilder::new()
//!     .start(2018, 1, 1)
//!     .years(1)
//!     .seed(7)
//!     .basic_account("Checking", Usd::dollars(500))
//!     .peer_to_peer_account("Investment", Usd::dollars(10_000), Usd::dollars(25))
//!     .line_item(LineItem::monthly_deposit("Checking", "Salary", Usd::dollars(7_000), 1))
//!     .build()?;
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod bank;
pub mod date_generator;
pub mod date_math;
pub mod error;
pub mod money;
pub mod process;
pub mod random;
pub mod report;
pub mod simulation;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use bank::Bank;
pub use config::{SimulationBuilder, SimulationConfig};
pub use error::{BankError, ConfigError, SimulationError};
pub use money::Usd;
