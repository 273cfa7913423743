use crate::model::TransactionKind;

/// Errors raised by ledger operations on accounts and the bank
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BankError {
    #[error("account {0:?} does not exist")]
    AccountDoesNotExist(String),

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("account {0:?} already exists")]
    AccountAlreadyExists(String),

    #[error("unknown transaction type {0}")]
    UnknownTransactionType(TransactionKind),

    /// The source has insufficient funds or one side failed validation
    #[error("invalid transfer")]
    InvalidTransfer,

    #[error("loan has been paid off")]
    LoanPaidOff,
}

/// Errors detected while validating a simulation configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange {
        start: jiff::civil::Date,
        end: jiff::civil::Date,
    },

    #[error("account {0:?} is defined more than once")]
    DuplicateAccount(String),

    #[error("line item {line_item:?} references unknown account {account:?}")]
    UnknownAccount { line_item: String, account: String },

    #[error("invalid beta distribution (alpha={alpha}, beta={beta})")]
    InvalidDistribution { alpha: f64, beta: f64 },

    #[error("probability {0} is outside [0, 1]")]
    InvalidProbability(f64),

    #[error("loan {0:?} must have a term of at least one year")]
    InvalidLoanTerm(String),

    #[error("account {0:?} must invest a positive amount per loan")]
    InvalidInvestmentSize(String),
}

/// Errors that stop a simulation run
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bank process exited without returning its final state")]
    BankUnavailable,

    #[error("report {0} could not be flushed")]
    ReportUnavailable(&'static str),
}

pub type Result<T> = std::result::Result<T, BankError>;
