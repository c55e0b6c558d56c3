//! Exchange-rate impact simulator: fetches a live rate, prices one unit under
//! an "actual" and a "new" rate, and renders the comparison.

pub mod app;
pub mod handlers;
pub mod models;
pub mod presentation;
pub mod services;
pub mod utils;

pub use models::pricing::{PricingResult, SimulationReport, SimulationRequest};
pub use services::pricing::{compute, PricingError};
