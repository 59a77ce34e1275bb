//! Numeric helpers shared by the calculators.
//!
//! Empty inputs produce `0.0` rather than `NaN` throughout: every result field
//! is always defined, and an absent series reads as "nothing to report".

use core_types::AggregatePoint;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::AnalyticsError;

/// Converts a decimal to `f64`, failing on values outside the float range.
pub fn to_f64(value: Decimal) -> Result<f64, AnalyticsError> {
    value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AnalyticsError::ComputationError(format!("cannot convert {} to f64", value)))
}

/// The net values of an aggregate as floats, in order.
pub fn net_values(points: &[AggregatePoint]) -> Result<Vec<f64>, AnalyticsError> {
    points.iter().map(|p| to_f64(p.net_value)).collect()
}

/// Fails if a computed metric is `NaN` or infinite.
pub fn ensure_finite(metric: &str, value: f64) -> Result<f64, AnalyticsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        tracing::error!(metric, value, "Non-finite result.");
        Err(AnalyticsError::ComputationError(format!(
            "metric '{}' is not finite ({})",
            metric, value
        )))
    }
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by `n`); `0.0` for an empty slice.
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Returns a sorted copy of `values`.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile of an ascending slice by linear interpolation between order statistics.
///
/// `q` is a fraction in `[0, 1]`: the rank is `q * (n - 1)` and the result
/// interpolates between the elements at the floor and ceiling of that rank.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Median of an ascending slice; the mean of the two central elements when the length is even.
pub fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    match n {
        0 => 0.0,
        _ if n % 2 == 1 => sorted[n / 2],
        _ => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

/// Period-over-period relative changes `(v[i] - v[i-1]) / |v[i-1]|`.
///
/// Steps whose previous value is zero have no defined change and are skipped.
pub fn relative_changes(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| (w[1] - w[0]) / w[0].abs())
        .collect()
}
