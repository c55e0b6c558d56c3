use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::pricing::{self, PricingError};

/// Cost and sale price of one unit under a single exchange rate.
///
/// Values are never rounded here; formatting belongs to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub cost_local: f64,
    pub sale_price_local: f64,
    pub sale_price_foreign: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    pub cost_per_unit: f64,
    pub exchange_rate: f64,
    pub margin: f64,
}

impl PricingInput {
    pub fn compute(&self) -> Result<PricingResult, PricingError> {
        pricing::compute(self.cost_per_unit, self.exchange_rate, self.margin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Actual,
    New,
}

impl ScenarioKind {
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioKind::Actual => "Actual",
            ScenarioKind::New => "New",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub exchange_rate: f64,
    pub result: PricingResult,
}

/// Where the actual-scenario exchange rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Manual,
    Live,
    Fallback,
}

// Payload accepted by both the CLI and the HTTP handlers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub cost_per_unit: f64,
    pub margin_percent: f64,
    #[serde(default)]
    pub actual_rate: Option<f64>,
    #[serde(default)]
    pub new_rate: Option<f64>,
}

impl SimulationRequest {
    pub fn margin(&self) -> f64 {
        self.margin_percent / 100.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub base_currency: String,
    pub quote_currency: String,
    pub cost_per_unit: f64,
    pub margin: f64,
    pub rate_source: RateSource,
    pub live_rate: Option<f64>,
    pub actual: Scenario,
    pub new: Scenario,
}

impl SimulationReport {
    pub fn scenarios(&self) -> [&Scenario; 2] {
        [&self.actual, &self.new]
    }

    pub fn cost_change_local(&self) -> f64 {
        self.new.result.cost_local - self.actual.result.cost_local
    }

    pub fn sale_price_change_local(&self) -> f64 {
        self.new.result.sale_price_local - self.actual.result.sale_price_local
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub base: String,
    pub quote: String,
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
}
