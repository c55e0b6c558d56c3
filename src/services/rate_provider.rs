use crate::app::config::Config;
use crate::models::pricing::RateQuote;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum RateError {
    #[error("missing API credential")]
    MissingCredential,
    #[error("rate request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("rate API returned HTTP {0}")]
    Status(u16),
    #[error("malformed rate response: {0}")]
    Decode(String),
    #[error("currency {0} not present in rate response")]
    MissingCurrency(String),
    #[error("{0}")]
    Unavailable(String),
}

/// Source of the exchange rate between two currencies.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self, base: &str, quote: &str) -> Result<RateQuote, RateError>;
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    timestamp: Option<i64>,
    rates: HashMap<String, f64>,
}

/// Client for the Open Exchange Rates `latest.json` endpoint.
pub struct OpenExchangeRatesClient {
    client: Client,
    api_url: String,
    app_id: String,
}

impl OpenExchangeRatesClient {
    pub fn new(api_url: impl Into<String>, app_id: impl Into<String>, timeout: Duration) -> Result<Self, RateError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            app_id: app_id.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RateError> {
        Self::new(
            config.rate_api_url.clone(),
            config.app_id.clone(),
            Duration::from_millis(config.rate_timeout_ms),
        )
    }
}

#[async_trait]
impl RateProvider for OpenExchangeRatesClient {
    async fn fetch_rate(&self, base: &str, quote: &str) -> Result<RateQuote, RateError> {
        if self.app_id.trim().is_empty() {
            return Err(RateError::MissingCredential);
        }

        debug!("Requesting {}/{} rate from {}", base, quote, self.api_url);

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("app_id", self.app_id.as_str()), ("base", base)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Rate API answered with status {}", status);
            return Err(RateError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let latest: LatestRatesResponse =
            serde_json::from_str(&body).map_err(|e| RateError::Decode(e.to_string()))?;

        let rate = *latest
            .rates
            .get(quote)
            .ok_or_else(|| RateError::MissingCurrency(quote.to_string()))?;

        let fetched_at = latest
            .timestamp
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .unwrap_or_else(Utc::now);

        info!("Fetched {}/{} rate: {}", base, quote, rate);

        Ok(RateQuote {
            base: base.to_string(),
            quote: quote.to_string(),
            rate,
            fetched_at,
        })
    }
}

/// Provider returning a fixed rate, or a fixed failure when built with `failing`.
pub struct StaticRateProvider {
    rate: Option<f64>,
}

impl StaticRateProvider {
    pub fn new(rate: f64) -> Self {
        Self { rate: Some(rate) }
    }

    pub fn failing() -> Self {
        Self { rate: None }
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn fetch_rate(&self, base: &str, quote: &str) -> Result<RateQuote, RateError> {
        match self.rate {
            Some(rate) => Ok(RateQuote {
                base: base.to_string(),
                quote: quote.to_string(),
                rate,
                fetched_at: Utc::now(),
            }),
            None => Err(RateError::Unavailable("live rate lookup disabled".to_string())),
        }
    }
}
