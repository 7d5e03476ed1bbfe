use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

/// A transaction is a signed amount applied to one account at a point in
/// time. Transactions are append-only and never mutated; the serde field
/// names are the persisted state-file layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Normalized account name this amount was applied to
    #[serde(rename = "acc")]
    pub account: String,
    /// Signed amount in cents
    #[serde(rename = "amt")]
    pub amount_cents: Cents,
    /// Free-text note supplied alongside the amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// When the transaction was recorded
    #[serde(rename = "time")]
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(account: impl Into<String>, amount_cents: Cents, recorded_at: DateTime<Utc>) -> Self {
        Self {
            account: account.into(),
            amount_cents,
            comment: None,
            recorded_at,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        if !comment.is_empty() {
            self.comment = Some(comment);
        }
        self
    }
}
