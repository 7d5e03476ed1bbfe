use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://api.exchangerate.host";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the external rate lookup. Every transport, HTTP-status or
/// payload-shape failure folds into one recoverable error the chat layer
/// reports back to the user.
#[derive(Error, Debug)]
pub enum RateError {
    #[error("Invalid currency pair: '{0}' (expected e.g. 'eurusd')")]
    InvalidPair(String),

    #[error("Invalid amount: '{0}'")]
    InvalidAmount(String),

    #[error("Rate lookup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate lookup returned an unusable response")]
    MalformedResponse,
}

/// A base/quote currency pair, e.g. EUR/USD from "eurusd".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub base: String,
    pub quote: String,
}

impl Pair {
    /// Parse a six-letter pair string into base and quote codes.
    pub fn parse(raw: &str) -> Result<Self, RateError> {
        let raw = raw.trim();
        if raw.len() != 6 || !raw.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RateError::InvalidPair(raw.to_string()));
        }
        let upper = raw.to_ascii_uppercase();
        Ok(Self {
            base: upper[..3].to_string(),
            quote: upper[3..].to_string(),
        })
    }
}

/// Result of a conversion: the converted amount and the unit rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub pair: Pair,
    pub amount: f64,
    pub result: f64,
    pub rate: f64,
}

#[derive(Deserialize)]
struct ConvertResponse {
    result: Option<f64>,
    info: Option<ConvertInfo>,
}

#[derive(Deserialize)]
struct ConvertInfo {
    rate: Option<f64>,
}

/// Client for the exchangerate.host convert endpoint.
///
/// Called from the dispatch layer only, never while the ledger lock is
/// held; the client-level timeout bounds how long a lookup can hang.
pub struct CurrencyConverter {
    client: reqwest::Client,
    base_url: String,
}

impl CurrencyConverter {
    pub fn new() -> Result<Self, RateError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, RateError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Convert an amount between the two currencies of a pair.
    pub async fn convert(&self, pair: Pair, amount: f64) -> Result<Conversion, RateError> {
        if !amount.is_finite() {
            return Err(RateError::InvalidAmount(amount.to_string()));
        }

        let url = format!("{}/convert", self.base_url);
        let amount_text = amount.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("from", pair.base.as_str()),
                ("to", pair.quote.as_str()),
                ("amount", amount_text.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: ConvertResponse = response.json().await?;
        let result = body.result.ok_or(RateError::MalformedResponse)?;
        let rate = body
            .info
            .and_then(|info| info.rate)
            .ok_or(RateError::MalformedResponse)?;

        Ok(Conversion {
            pair,
            amount,
            result,
            rate,
        })
    }
}
