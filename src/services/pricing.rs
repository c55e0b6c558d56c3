use crate::models::pricing::PricingResult;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidInput {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl PricingError {
    fn invalid(parameter: &'static str, value: f64, reason: &'static str) -> Self {
        PricingError::InvalidInput {
            parameter,
            value,
            reason,
        }
    }

    pub fn parameter(&self) -> &'static str {
        match self {
            PricingError::InvalidInput { parameter, .. } => parameter,
        }
    }
}

/// Applies the margin formula to one unit cost.
///
/// `exchange_rate` must be > 0, `margin` must be in `[0, 1)` and
/// `cost_per_unit` must be >= 0. Non-finite values are rejected as well, and
/// so are inputs whose result would overflow `f64`.
pub fn compute(
    cost_per_unit: f64,
    exchange_rate: f64,
    margin: f64,
) -> Result<PricingResult, PricingError> {
    if !cost_per_unit.is_finite() {
        return Err(PricingError::invalid("cost_per_unit", cost_per_unit, "must be a finite number"));
    }
    if cost_per_unit < 0.0 {
        return Err(PricingError::invalid("cost_per_unit", cost_per_unit, "must not be negative"));
    }
    if !exchange_rate.is_finite() {
        return Err(PricingError::invalid("exchange_rate", exchange_rate, "must be a finite number"));
    }
    if exchange_rate <= 0.0 {
        return Err(PricingError::invalid("exchange_rate", exchange_rate, "must be greater than zero"));
    }
    if !margin.is_finite() {
        return Err(PricingError::invalid("margin", margin, "must be a finite number"));
    }
    if !(0.0..1.0).contains(&margin) {
        return Err(PricingError::invalid("margin", margin, "must be in [0, 1)"));
    }

    let cost_local = cost_per_unit * exchange_rate;
    if !cost_local.is_finite() {
        return Err(PricingError::invalid("cost_per_unit", cost_per_unit, "local cost overflows"));
    }
    let sale_price_local = cost_local / (1.0 - margin);
    if !sale_price_local.is_finite() {
        return Err(PricingError::invalid("margin", margin, "local sale price overflows"));
    }
    let sale_price_foreign = sale_price_local / exchange_rate;
    if !sale_price_foreign.is_finite() {
        return Err(PricingError::invalid("exchange_rate", exchange_rate, "foreign sale price overflows"));
    }

    Ok(PricingResult {
        cost_local,
        sale_price_local,
        sale_price_foreign,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS * b.abs().max(1.0), "{} != {}", a, b);
    }

    #[test]
    fn test_current_rate_scenario() {
        let result = compute(12.00, 30.0, 0.30).unwrap();
        assert_close(result.cost_local, 360.0);
        assert_close(result.sale_price_local, 360.0 / 0.7);
        assert_close(result.sale_price_foreign, 12.0 / 0.7);
        assert!((result.sale_price_local - 514.2857).abs() < 1e-4);
        assert!((result.sale_price_foreign - 17.1428).abs() < 1e-4);
    }

    #[test]
    fn test_projected_rate_scenario_keeps_foreign_price() {
        let current = compute(12.00, 30.0, 0.30).unwrap();
        let projected = compute(12.00, 35.0, 0.30).unwrap();

        assert_close(projected.cost_local, 420.0);
        assert_close(projected.sale_price_local, 600.0);
        assert_close(projected.sale_price_foreign, current.sale_price_foreign);
    }

    #[test]
    fn test_zero_margin_sells_at_cost() {
        let result = compute(12.00, 30.0, 0.0).unwrap();
        assert_eq!(result.sale_price_local, result.cost_local);
        assert_eq!(result.sale_price_foreign, 12.0);
    }

    #[test]
    fn test_full_margin_is_rejected() {
        let err = compute(12.00, 30.0, 1.0).unwrap_err();
        assert_eq!(err.parameter(), "margin");
    }

    #[test]
    fn test_negative_margin_is_rejected() {
        let err = compute(12.00, 30.0, -0.1).unwrap_err();
        assert_eq!(err.parameter(), "margin");
    }

    #[test]
    fn test_zero_and_negative_rates_are_rejected() {
        assert_eq!(compute(12.00, 0.0, 0.3).unwrap_err().parameter(), "exchange_rate");
        assert_eq!(compute(12.00, -5.0, 0.3).unwrap_err().parameter(), "exchange_rate");
    }

    #[test]
    fn test_non_finite_inputs_are_rejected() {
        assert_eq!(compute(f64::NAN, 30.0, 0.3).unwrap_err().parameter(), "cost_per_unit");
        assert_eq!(compute(12.0, f64::INFINITY, 0.3).unwrap_err().parameter(), "exchange_rate");
        assert_eq!(compute(12.0, 30.0, f64::NAN).unwrap_err().parameter(), "margin");
    }

    #[test]
    fn test_negative_cost_is_rejected() {
        assert_eq!(compute(-1.0, 30.0, 0.3).unwrap_err().parameter(), "cost_per_unit");
    }

    #[test]
    fn test_zero_cost_yields_zero() {
        let result = compute(0.0, 30.0, 0.3).unwrap();
        assert_eq!(result.cost_local, 0.0);
        assert_eq!(result.sale_price_local, 0.0);
        assert_eq!(result.sale_price_foreign, 0.0);
    }

    #[test]
    fn test_overflowing_results_are_rejected() {
        assert_eq!(compute(1e200, 1e200, 0.5).unwrap_err().parameter(), "cost_per_unit");
        assert_eq!(compute(1e300, 1e8, 0.999_999_999).unwrap_err().parameter(), "margin");
        assert_eq!(compute(1e305, 1e-10, 0.9999).unwrap_err().parameter(), "exchange_rate");
    }

    #[test]
    fn test_error_message_names_parameter() {
        let err = compute(12.0, 30.0, 1.0).unwrap_err();
        assert_eq!(err.to_string(), "invalid margin = 1: must be in [0, 1)");
    }

    proptest! {
        #[test]
        fn prop_margin_marks_up_cost(
            cost in 0.01f64..10_000.0,
            rate in 0.01f64..1_000_000.0,
            margin in 0.001f64..0.99,
        ) {
            let result = compute(cost, rate, margin).unwrap();
            prop_assert!(result.sale_price_local > result.cost_local);
        }

        #[test]
        fn prop_foreign_price_converts_back(
            cost in 0.0f64..10_000.0,
            rate in 0.01f64..1_000_000.0,
            margin in 0.0f64..0.99,
        ) {
            let result = compute(cost, rate, margin).unwrap();
            let back = result.sale_price_foreign * rate;
            prop_assert!((back - result.sale_price_local).abs() <= 1e-9 * result.sale_price_local.max(1.0));
        }

        #[test]
        fn prop_foreign_price_ignores_rate(
            cost in 0.0f64..10_000.0,
            rate_a in 0.01f64..100_000.0,
            rate_b in 0.01f64..100_000.0,
            margin in 0.0f64..0.99,
        ) {
            let a = compute(cost, rate_a, margin).unwrap();
            let b = compute(cost, rate_b, margin).unwrap();
            let expected = cost / (1.0 - margin);
            prop_assert!((a.sale_price_foreign - expected).abs() <= 1e-9 * expected.max(1.0));
            prop_assert!((b.sale_price_foreign - expected).abs() <= 1e-9 * expected.max(1.0));
        }
    }
}
