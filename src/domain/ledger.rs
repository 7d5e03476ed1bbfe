use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Cents, Transaction};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    #[error("Balance out of range for account: {0}")]
    BalanceOutOfRange(String),
}

/// The full ledger state: every account with its running balance, plus
/// the ordered transaction history. Accounts keep creation order, which
/// is also the order balance listings are rendered in.
///
/// Invariant: each account's balance equals the exact sum of the history
/// amounts recorded for it since its most recent creation. Deleting an
/// account removes its history as well, so the invariant survives
/// re-creating the same name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LedgerState {
    pub accounts: IndexMap<String, Cents>,
    pub history: Vec<Transaction>,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account with a zero balance.
    pub fn create_account(&mut self, name: &str) -> Result<(), LedgerError> {
        if self.accounts.contains_key(name) {
            return Err(LedgerError::AccountAlreadyExists(name.to_string()));
        }
        self.accounts.insert(name.to_string(), 0);
        Ok(())
    }

    /// Remove an account and every transaction recorded against it.
    pub fn delete_account(&mut self, name: &str) -> Result<(), LedgerError> {
        // shift_remove keeps the creation order of the remaining accounts
        if self.accounts.shift_remove(name).is_none() {
            return Err(LedgerError::AccountNotFound(name.to_string()));
        }
        self.history.retain(|tx| tx.account != name);
        Ok(())
    }

    /// Apply a signed amount to an account: balance update and history
    /// append happen together or not at all.
    pub fn apply(
        &mut self,
        name: &str,
        amount_cents: Cents,
        comment: Option<&str>,
        recorded_at: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError> {
        let balance = self
            .accounts
            .get_mut(name)
            .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))?;
        // Nothing is mutated until the new balance is known to fit.
        *balance = balance
            .checked_add(amount_cents)
            .ok_or_else(|| LedgerError::BalanceOutOfRange(name.to_string()))?;

        let mut tx = Transaction::new(name, amount_cents, recorded_at);
        if let Some(comment) = comment {
            tx = tx.with_comment(comment);
        }
        self.history.push(tx.clone());
        Ok(tx)
    }

    /// Balance of a single account. A missing account is an error, never
    /// a silent zero.
    pub fn balance(&self, name: &str) -> Result<Cents, LedgerError> {
        self.accounts
            .get(name)
            .copied()
            .ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))
    }

    /// All balances in account-creation order.
    pub fn balances(&self) -> impl Iterator<Item = (&str, Cents)> {
        self.accounts.iter().map(|(name, cents)| (name.as_str(), *cents))
    }

    /// Recompute one account's balance from history alone. Used to check
    /// the balance invariant.
    pub fn balance_from_history(&self, name: &str) -> Cents {
        self.history
            .iter()
            .filter(|tx| tx.account == name)
            .map(|tx| tx.amount_cents)
            .sum()
    }
}

/// Normalize an account name into its ledger key form.
///
/// Names are case-insensitive and must be non-empty ASCII alphanumerics
/// or underscores (the shape a chat command can address).
pub fn normalize_account_name(raw: &str) -> Option<String> {
    let name = raw.trim().to_ascii_lowercase();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some(name)
}
