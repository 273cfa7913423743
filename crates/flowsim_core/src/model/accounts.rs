//! Account definitions
//!
//! Every account keeps an ordered ledger of the transactions it accepted.
//! [`Account`] dispatches the shared capability set (balance, validate,
//! append, update) to the concrete variant.

use std::fmt;

use jiff::civil::Date;
use tracing::debug;

use super::loan::LoanAccount;
use super::peer_to_peer::PeerToPeerAccount;
use super::transaction::{Transaction, TransactionKind};
use crate::error::{BankError, Result};
use crate::money::Usd;
use crate::process::Context;
use crate::random::RandomSource;

#[derive(Debug, Clone)]
pub enum Account {
    /// Checking / savings style balance
    Basic(BankAccount),
    /// Borrower side of an amortizing loan
    Loan(LoanAccount),
    /// Peer-to-peer lending portfolio
    PeerToPeer(PeerToPeerAccount),
}

impl Account {
    pub fn name(&self) -> &str {
        match self {
            Account::Basic(a) => &a.name,
            Account::Loan(a) => &a.name,
            Account::PeerToPeer(a) => &a.name,
        }
    }

    /// Funds a transfer may draw from (remaining balance for a loan).
    pub fn current_balance(&self) -> Usd {
        match self {
            Account::Basic(a) => a.current_balance(),
            Account::Loan(a) => a.current_balance(),
            Account::PeerToPeer(a) => a.current_balance(),
        }
    }

    pub fn validate(&self, tx: &Transaction) -> bool {
        match self {
            Account::Basic(a) => a.validate(tx),
            Account::Loan(a) => a.validate(tx),
            Account::PeerToPeer(a) => a.validate(tx),
        }
    }

    pub fn append(&mut self, tx: Transaction) -> Result<()> {
        match self {
            Account::Basic(a) => a.append(tx),
            Account::Loan(a) => a.append(tx),
            Account::PeerToPeer(a) => a.append(tx),
        }
    }

    /// Per-day tick, run after all line items for `date` were processed.
    pub fn update(&mut self, date: Date, rng: &mut dyn RandomSource, ctx: &mut Context) {
        match self {
            Account::Basic(_) | Account::Loan(_) => {}
            Account::PeerToPeer(a) => a.update(date, rng, ctx),
        }
    }

    pub fn ledger(&self) -> &[Transaction] {
        match self {
            Account::Basic(a) => &a.ledger,
            Account::Loan(a) => &a.ledger,
            Account::PeerToPeer(a) => &a.ledger,
        }
    }

    pub fn as_loan(&self) -> Option<&LoanAccount> {
        match self {
            Account::Loan(loan) => Some(loan),
            _ => None,
        }
    }

    pub fn as_peer_to_peer(&self) -> Option<&PeerToPeerAccount> {
        match self {
            Account::PeerToPeer(p2p) => Some(p2p),
            _ => None,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Account::Basic(a) => fmt::Display::fmt(a, f),
            Account::Loan(a) => fmt::Display::fmt(a, f),
            Account::PeerToPeer(a) => fmt::Display::fmt(a, f),
        }
    }
}

impl From<BankAccount> for Account {
    fn from(account: BankAccount) -> Self {
        Account::Basic(account)
    }
}

impl From<LoanAccount> for Account {
    fn from(account: LoanAccount) -> Self {
        Account::Loan(account)
    }
}

impl From<PeerToPeerAccount> for Account {
    fn from(account: PeerToPeerAccount) -> Self {
        Account::PeerToPeer(account)
    }
}

/// The simplest account: a balance and its ledger
#[derive(Debug, Clone, PartialEq)]
pub struct BankAccount {
    pub name: String,
    pub balance: Usd,
    pub ledger: Vec<Transaction>,
}

impl BankAccount {
    /// Open an account, recording the initial balance as a deposit.
    pub fn new(name: impl Into<String>, date: Date, initial: Usd) -> Self {
        Self {
            name: name.into(),
            balance: initial,
            ledger: vec![Transaction::deposit(date, "Initial deposit", initial)],
        }
    }

    pub fn current_balance(&self) -> Usd {
        self.balance
    }

    pub fn append(&mut self, tx: Transaction) -> Result<()> {
        debug!(account = %self.name, %tx, "append");
        match tx.kind {
            TransactionKind::Deposit => {
                self.balance += tx.amount;
                self.ledger.push(tx);
            }
            TransactionKind::Withdrawal => {
                if tx.amount > self.balance {
                    return Err(BankError::InsufficientFunds);
                }
                self.balance -= tx.amount;
                self.ledger.push(tx);
            }
            other => return Err(BankError::UnknownTransactionType(other)),
        }
        Ok(())
    }

    /// Pre-commit check used by transfers.
    ///
    /// Withdrawals must leave a strictly positive balance, so withdrawing the
    /// exact balance fails validation even though `append` would accept it.
    pub fn validate(&self, tx: &Transaction) -> bool {
        match tx.kind {
            TransactionKind::Deposit => true,
            TransactionKind::Withdrawal => self.balance > tx.amount,
            TransactionKind::MonthlyPayment => false,
        }
    }
}

impl fmt::Display for BankAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.name, self.balance)
    }
}
