mod account_info;
mod accounts;
mod line_items;
mod loan;
mod peer_to_peer;
mod transaction;

pub use account_info::AccountInfo;
pub use accounts::{Account, BankAccount};
pub use line_items::{
    DailyRandomTransaction, LineItem, LoanPayment, MonthlyTransaction, MonthlyTransfer,
    OneTimeTransaction, WeekdayOdds,
};
pub use loan::LoanAccount;
pub use peer_to_peer::{
    CHARGE_OFF_PROBABILITY, DAILY_ORIGINATION_LIMIT, LOAN_TERM_MONTHS, LendingDistributions,
    MicroLoan, PeerToPeerAccount, random_future_business_day,
};
pub use transaction::{Transaction, TransactionKind};
