use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::money::Usd;

/// Snapshot of an investment account broadcast to the report sinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub date: Date,
    pub available_cash: Usd,
    pub account_value: Usd,
    /// Cash received from loans since the previous snapshot
    pub cash_flow: Usd,
    /// Interest earned since the previous snapshot
    pub interest: Usd,
}
