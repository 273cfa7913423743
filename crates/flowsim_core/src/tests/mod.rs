//! Integration tests for the flowsim simulation engine
//!
//! Tests are organized by topic:
//! - `accounts` - Basic account postings and validation
//! - `loan` - Amortization schedule and payoff
//! - `peer_to_peer` - Micro-loan origination, repayment and charge-off
//! - `bank` - Routing, transfers and the daily handler
//! - `line_items` - Scheduled cash events
//! - `process` - Message-passing runtime
//! - `simulation` - Direct, batch and pipeline runs
//! - `builder_dsl` - Builder DSL and configuration validation

mod accounts;
mod builder_dsl;
mod line_items;
mod simulation;

use crate::random::{BetaDistribution, RandomSource};

/// Random source returning the same draws every time
#[derive(Debug, Clone, Copy)]
pub(crate) struct FixedDraws {
    pub uniform: f64,
    pub beta: f64,
}

impl RandomSource for FixedDraws {
    fn uniform(&mut self) -> f64 {
        self.uniform
    }

    fn beta(&mut self, _dist: &BetaDistribution) -> f64 {
        self.beta
    }
}
