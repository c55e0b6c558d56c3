pub mod atomic_metrics;
pub mod pricing;
pub mod rate_provider;
pub mod simulator_service;

pub use pricing::{compute, PricingError};
pub use rate_provider::{OpenExchangeRatesClient, RateError, RateProvider, StaticRateProvider};
pub use simulator_service::{ServiceError, SimulatorService};
