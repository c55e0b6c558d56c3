pub mod metrics;
pub mod rate;
pub mod simulate;
