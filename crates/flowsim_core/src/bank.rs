//! Ledger host
//!
//! The [`Bank`] owns every account, the ordered list of line items and the
//! random source of a run. [`BankProcess`] hosts it inside the process runtime.

use std::collections::BTreeMap;
use std::fmt;

use jiff::civil::Date;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::error::{BankError, Result};
use crate::model::{Account, LineItem, Transaction};
use crate::money::Usd;
use crate::process::{Context, Handler, Message, Payload};
use crate::random::{self, RandomSource};

pub struct Bank {
    // Ordered by name so per-day account updates draw randoms in a fixed order
    accounts: BTreeMap<String, Account>,
    line_items: Vec<LineItem>,
    rng: Box<dyn RandomSource>,
}

impl Bank {
    pub fn new(rng: impl RandomSource + 'static) -> Self {
        Self {
            accounts: BTreeMap::new(),
            line_items: Vec::new(),
            rng: Box::new(rng),
        }
    }

    /// A bank drawing from a [`random::seeded`] generator.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(random::seeded(seed))
    }

    pub fn add_account(&mut self, account: impl Into<Account>) -> Result<()> {
        let account = account.into();
        let name = account.name().to_string();
        if self.accounts.contains_key(&name) {
            return Err(BankError::AccountAlreadyExists(name));
        }
        self.accounts.insert(name, account);
        Ok(())
    }

    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.get(name)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn add_line_item(&mut self, item: LineItem) {
        self.line_items.push(item);
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    pub fn rng(&mut self) -> &mut dyn RandomSource {
        self.rng.as_mut()
    }

    /// Post `tx` to the named account.
    pub fn append(&mut self, name: &str, tx: Transaction) -> Result<()> {
        self.accounts
            .get_mut(name)
            .ok_or_else(|| BankError::AccountDoesNotExist(name.to_string()))?
            .append(tx)
    }

    /// Move `amount` from one account to another.
    ///
    /// Both sides are validated before anything is posted. The withdrawal is
    /// applied first; an error on the deposit side leaves it in place.
    pub fn transfer(&mut self, date: Date, from: &str, to: &str, amount: Usd) -> Result<()> {
        if from == to {
            return Err(BankError::InvalidTransfer);
        }
        let source = self
            .accounts
            .get(from)
            .ok_or_else(|| BankError::AccountDoesNotExist(from.to_string()))?;
        let target = self
            .accounts
            .get(to)
            .ok_or_else(|| BankError::AccountDoesNotExist(to.to_string()))?;

        if source.current_balance() < amount {
            return Err(BankError::InsufficientFunds);
        }

        let description = format!("Transfer from '{from}' to '{to}'");
        let withdrawal = Transaction::withdrawal(date, description.clone(), amount);
        let deposit = Transaction::deposit(date, description, amount);
        if !source.validate(&withdrawal) || !target.validate(&deposit) {
            return Err(BankError::InvalidTransfer);
        }

        self.append(from, withdrawal)?;
        self.append(to, deposit)
    }

    /// Run one simulated day: every line item in declaration order, then every
    /// account's daily update. Line item failures are logged and skipped.
    pub fn handle_date(&mut self, date: Date, ctx: &mut Context) {
        let line_items = std::mem::take(&mut self.line_items);
        for item in &line_items {
            if let Err(err) = item.process(date, self) {
                warn!(date = %date, item = %item.describe().trim(), %err, "line item failed");
            }
        }
        self.line_items = line_items;

        let rng = self.rng.as_mut();
        for account in self.accounts.values_mut() {
            account.update(date, rng, ctx);
        }
    }
}

impl fmt::Debug for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bank")
            .field("accounts", &self.accounts)
            .field("line_items", &self.line_items)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for account in self.accounts.values() {
            writeln!(f, "{account}")?;
        }
        Ok(())
    }
}

/// Process handler that feeds `DATE` messages into a [`Bank`]
///
/// When the worker exits the bank is handed back through the channel given
/// to [`BankProcess::new`].
pub struct BankProcess {
    bank: Bank,
    done: Option<oneshot::Sender<Bank>>,
}

impl BankProcess {
    pub fn new(bank: Bank) -> (Self, oneshot::Receiver<Bank>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                bank,
                done: Some(tx),
            },
            rx,
        )
    }
}

impl Handler for BankProcess {
    fn handle(&mut self, ctx: &mut Context, msg: &Message) {
        match &msg.payload {
            Payload::Date(date) => {
                trace!(date = %date, "bank day");
                self.bank.handle_date(*date, ctx);
            }
            Payload::Start => debug!(accounts = self.bank.accounts.len(), "bank started"),
            other => trace!(?other, "bank ignored message"),
        }
    }

    fn finish(mut self: Box<Self>) {
        if let Some(done) = self.done.take() {
            // Nobody waiting for the final state is not an error
            let _ = done.send(self.bank);
        }
    }
}
