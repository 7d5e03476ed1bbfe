use thiserror::Error;

use crate::domain::{EvalError, LedgerError};
use crate::rates::RateError;
use crate::storage::StoreError;

/// Everything that can go wrong while handling a user request.
///
/// All variants are reported back as a reply to the originating message;
/// none of them terminate the process. Persistence failures are the one
/// class that is additionally logged loudly, since they imply data-loss
/// risk rather than a bad request.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Usage(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Account already exists: {0}")]
    AccountAlreadyExists(String),

    #[error(transparent)]
    Expression(#[from] EvalError),

    #[error("Failed to save ledger state: {0}")]
    Persistence(#[from] StoreError),

    #[error(transparent)]
    Conversion(#[from] RateError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountNotFound(name) => AppError::AccountNotFound(name),
            LedgerError::AccountAlreadyExists(name) => AppError::AccountAlreadyExists(name),
            LedgerError::BalanceOutOfRange(name) => {
                AppError::Usage(format!("Balance out of range for account: {}", name))
            }
        }
    }
}
