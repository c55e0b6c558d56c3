use crate::app::config::Config;
use crate::models::pricing::{
    PricingInput, RateQuote, RateSource, Scenario, ScenarioKind, SimulationReport, SimulationRequest,
};
use crate::services::atomic_metrics::AtomicMetrics;
use crate::services::pricing::PricingError;
use crate::services::rate_provider::{RateError, RateProvider};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error("no exchange rate available: {0}")]
    RateUnavailable(String),
}

/// Runs one actual-vs-new comparison per request.
pub struct SimulatorService {
    provider: Arc<dyn RateProvider>,
    base_currency: String,
    quote_currency: String,
    fallback_rate: Option<f64>,
    new_rate_offset: f64,
    default_cost: f64,
    default_margin_percent: f64,
    metrics: AtomicMetrics,
}

impl SimulatorService {
    pub fn new(provider: Arc<dyn RateProvider>, config: &Config) -> Self {
        Self {
            provider,
            base_currency: config.base_currency.clone(),
            quote_currency: config.quote_currency.clone(),
            fallback_rate: config.fallback_rate,
            new_rate_offset: config.new_rate_offset,
            default_cost: config.default_cost,
            default_margin_percent: config.default_margin_percent,
            metrics: AtomicMetrics::new(),
        }
    }

    /// Fills the fields a caller left out with the configured defaults.
    pub fn build_request(
        &self,
        cost_per_unit: Option<f64>,
        margin_percent: Option<f64>,
        actual_rate: Option<f64>,
        new_rate: Option<f64>,
    ) -> SimulationRequest {
        SimulationRequest {
            cost_per_unit: cost_per_unit.unwrap_or(self.default_cost),
            margin_percent: margin_percent.unwrap_or(self.default_margin_percent),
            actual_rate,
            new_rate,
        }
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn quote_currency(&self) -> &str {
        &self.quote_currency
    }

    pub async fn current_rate(&self) -> Result<RateQuote, RateError> {
        match self
            .provider
            .fetch_rate(&self.base_currency, &self.quote_currency)
            .await
        {
            Ok(quote) => {
                self.metrics.increment_rate_fetch_ok();
                Ok(quote)
            }
            Err(e) => {
                self.metrics.increment_rate_fetch_failed();
                Err(e)
            }
        }
    }

    pub async fn simulate(&self, request: &SimulationRequest) -> Result<SimulationReport, ServiceError> {
        let (actual_rate, rate_source, live_rate) = self.resolve_actual_rate(request.actual_rate).await?;
        let new_rate = request
            .new_rate
            .unwrap_or(actual_rate + self.new_rate_offset);
        let margin = request.margin();

        let scenario = |kind: ScenarioKind, exchange_rate: f64| -> Result<Scenario, PricingError> {
            let input = PricingInput {
                cost_per_unit: request.cost_per_unit,
                exchange_rate,
                margin,
            };
            Ok(Scenario {
                kind,
                exchange_rate,
                result: input.compute()?,
            })
        };

        let scenarios = scenario(ScenarioKind::Actual, actual_rate)
            .and_then(|actual| Ok((actual, scenario(ScenarioKind::New, new_rate)?)));

        let (actual, new) = match scenarios {
            Ok(pair) => pair,
            Err(e) => {
                self.metrics.increment_rejected();
                warn!("Rejected simulation: {}", e);
                return Err(e.into());
            }
        };

        self.metrics.increment_simulations();
        info!(
            "Simulated cost {} at rates {} -> {} ({:?})",
            request.cost_per_unit, actual_rate, new_rate, rate_source
        );

        Ok(SimulationReport {
            base_currency: self.base_currency.clone(),
            quote_currency: self.quote_currency.clone(),
            cost_per_unit: request.cost_per_unit,
            margin,
            rate_source,
            live_rate,
            actual,
            new,
        })
    }

    async fn resolve_actual_rate(
        &self,
        manual: Option<f64>,
    ) -> Result<(f64, RateSource, Option<f64>), ServiceError> {
        if let Some(rate) = manual {
            return Ok((rate, RateSource::Manual, None));
        }

        let failure = match self.current_rate().await {
            Ok(quote) if quote.rate.is_finite() && quote.rate > 0.0 => {
                return Ok((quote.rate, RateSource::Live, Some(quote.rate)));
            }
            Ok(quote) => format!("provider returned unusable rate {}", quote.rate),
            Err(e) => e.to_string(),
        };

        match self.fallback_rate {
            Some(rate) => {
                warn!("Live rate unavailable ({}), using fallback rate {}", failure, rate);
                self.metrics.increment_fallback_used();
                Ok((rate, RateSource::Fallback, None))
            }
            None => {
                warn!("Live rate unavailable ({}) and no fallback configured", failure);
                Err(ServiceError::RateUnavailable(failure))
            }
        }
    }

    pub fn get_metrics(&self) -> serde_json::Value {
        self.metrics.snapshot()
    }
}
