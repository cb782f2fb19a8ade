//! Compound growth and discounting
//!
//! Rates are percentages per period (5.0 means 5%), matching the profile inputs.

use crate::error::{CalculatorError, Result};

/// Growth factor `(1 + rate/100)^periods`
fn growth_factor(rate_per_period_percent: f64, periods: f64) -> f64 {
    (1.0 + rate_per_period_percent / 100.0).powf(periods)
}

/// Value of `present_value` after compounding for `periods` periods.
///
/// `periods` may be fractional, zero or negative.
pub fn future_value(present_value: f64, rate_per_period_percent: f64, periods: f64) -> f64 {
    present_value * growth_factor(rate_per_period_percent, periods)
}

/// Value today of `future_value` received after `periods` periods.
/// Inverse of [`future_value`].
pub fn present_value(future_value: f64, rate_per_period_percent: f64, periods: f64) -> Result<f64> {
    let factor = growth_factor(rate_per_period_percent, periods);
    // A zero base raised to any nonzero power divides by zero, including the
    // negative powers where powf yields infinity
    let zero_base = 1.0 + rate_per_period_percent / 100.0 == 0.0;
    if factor == 0.0 || (zero_base && periods != 0.0) {
        return Err(CalculatorError::DivisionByZero {
            rate: rate_per_period_percent,
        });
    }
    Ok(future_value / factor)
}
