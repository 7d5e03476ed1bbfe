use chrono::Utc;
use tokio::sync::Mutex;
use tracing::error;

use crate::domain::{cents_from_f64, evaluate, normalize_account_name, Cents, LedgerState, Transaction};
use crate::storage::JsonStore;

use super::AppError;

/// High-level ledger operations behind a single coarse lock.
///
/// The chat transport dispatches overlapping messages, so every
/// read-then-write operation runs under one mutex over the whole state.
/// Mutations follow a clone-save-swap protocol: the new state becomes
/// visible in memory only after the store confirms a durable write, so
/// a caller is never told "recorded" ahead of persistence.
pub struct LedgerService {
    state: Mutex<LedgerState>,
    store: JsonStore,
}

impl LedgerService {
    /// Open the ledger at the given state file, loading prior state if
    /// any exists.
    pub fn open(store: JsonStore) -> Result<Self, AppError> {
        let state = store.load()?;
        Ok(Self {
            state: Mutex::new(state),
            store,
        })
    }

    /// Create a new account with a zero balance.
    pub async fn create_account(&self, name: &str) -> Result<String, AppError> {
        let name = normalize(name)?;
        let mut state = self.state.lock().await;

        let mut next = state.clone();
        next.create_account(&name)?;
        self.persist(&next)?;
        *state = next;
        Ok(name)
    }

    /// Delete an account along with its transaction history.
    pub async fn delete_account(&self, name: &str) -> Result<String, AppError> {
        let name = normalize(name)?;
        let mut state = self.state.lock().await;

        let mut next = state.clone();
        next.delete_account(&name)?;
        self.persist(&next)?;
        *state = next;
        Ok(name)
    }

    /// Resolve an amount expression and apply it to an account.
    ///
    /// Balance update, history append and durable save are indivisible
    /// with respect to concurrent calls: either all three happen or the
    /// state is untouched.
    pub async fn record_transaction(
        &self,
        name: &str,
        amount_text: &str,
        comment: &str,
    ) -> Result<Transaction, AppError> {
        let name = normalize(name)?;
        let amount = evaluate(amount_text)?;
        let amount_cents = cents_from_f64(amount)
            .ok_or_else(|| AppError::Usage(format!("Amount out of range: {}", amount_text)))?;

        let mut state = self.state.lock().await;

        let mut next = state.clone();
        let tx = next.apply(&name, amount_cents, Some(comment), Utc::now())?;
        self.persist(&next)?;
        *state = next;
        Ok(tx)
    }

    /// Balance of a single account; missing accounts are an error.
    pub async fn balance(&self, name: &str) -> Result<Cents, AppError> {
        let name = normalize(name)?;
        let state = self.state.lock().await;
        Ok(state.balance(&name)?)
    }

    /// Snapshot of all balances in account-creation order.
    pub async fn balances(&self) -> Vec<(String, Cents)> {
        let state = self.state.lock().await;
        state
            .balances()
            .map(|(name, cents)| (name.to_string(), cents))
            .collect()
    }

    /// Number of recorded transactions.
    pub async fn history_len(&self) -> usize {
        self.state.lock().await.history.len()
    }

    fn persist(&self, state: &LedgerState) -> Result<(), AppError> {
        self.store.save(state).map_err(|err| {
            error!(path = %self.store.path().display(), %err, "failed to persist ledger state");
            AppError::from(err)
        })
    }
}

fn normalize(raw: &str) -> Result<String, AppError> {
    normalize_account_name(raw)
        .ok_or_else(|| AppError::Usage(format!("Invalid account name: '{}'", raw.trim())))
}
