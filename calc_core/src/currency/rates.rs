//! # Exchange-Rate Provider
//!
//! Rates come from a public endpoint returning one document per base
//! currency:
//!
//! ```text
//! GET https://api.exchangerate-api.com/v4/latest/USD
//!
//! { "base": "USD", "date": "2025-03-05", "time_last_updated": 1741132801,
//!   "rates": { "USD": 1, "THB": 33.71, "EUR": 0.93, ... } }
//! ```
//!
//! [`RateProvider`] is the seam the converter session fetches through, so
//! tests can drive the session without a network.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::codes::CurrencyCode;
use crate::errors::{CalcError, CalcResult};

/// Default public endpoint; the base currency code is appended as a path
/// segment.
pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Rate document for one base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateDocument {
    pub base: String,
    #[serde(default)]
    pub date: Option<String>,
    /// Unix seconds of the provider's last update
    #[serde(default)]
    pub time_last_updated: Option<i64>,
    /// Units of each currency per one unit of `base`
    pub rates: HashMap<String, f64>,
}

impl RateDocument {
    /// Rate for `to`; absent, non-finite or non-positive rates are errors.
    pub fn rate_for(&self, to: CurrencyCode) -> CalcResult<f64> {
        match self.rates.get(to.as_str()) {
            Some(&rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
            _ => Err(CalcError::rate_not_found(self.base.clone(), to.as_str())),
        }
    }
}

/// Source of rate documents.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetch the latest document for `base`.
    async fn latest(&self, base: CurrencyCode) -> CalcResult<RateDocument>;

    /// Fetch and read the single `from -> to` rate.
    async fn rate(&self, from: CurrencyCode, to: CurrencyCode) -> CalcResult<f64> {
        let document = self.latest(from).await?;
        document.rate_for(to)
    }
}

/// [`RateProvider`] over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRateProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> CalcResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("everyday-calc/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| CalcError::Internal {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(HttpRateProvider {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Provider for the public endpoint with the default timeout.
    pub fn with_defaults() -> CalcResult<Self> {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn url_for(&self, base: CurrencyCode) -> String {
        format!("{}/{}", self.base_url, base)
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn latest(&self, base: CurrencyCode) -> CalcResult<RateDocument> {
        let url = self.url_for(base);
        tracing::debug!(%url, "fetching exchange rates");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CalcError::fetch_failed(&url, format!("Network error: {}", e)))?;

        if !response.status().is_success() {
            return Err(CalcError::fetch_failed(
                &url,
                format!("Rate API returned {}", response.status()),
            ));
        }

        let document: RateDocument = response
            .json()
            .await
            .map_err(|e| CalcError::fetch_failed(&url, format!("Failed to parse response: {}", e)))?;

        tracing::debug!(%url, rates = document.rates.len(), "exchange rates received");
        Ok(document)
    }
}
