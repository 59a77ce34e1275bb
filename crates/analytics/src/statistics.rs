use core_types::SignedRecord;
use rust_decimal::Decimal;

use crate::error::AnalyticsError;
use crate::report::{Percentiles, StatisticsResult};
use crate::series::{self, ensure_finite, to_f64};

/// Computes descriptive statistics over the signed values of `records`.
///
/// The total is summed exactly in decimal before conversion. An empty input
/// returns the all-zero result rather than an error.
pub fn calculate_statistics(records: &[SignedRecord]) -> Result<StatisticsResult, AnalyticsError> {
    if records.is_empty() {
        return Ok(StatisticsResult::default());
    }

    let total_exact = records
        .iter()
        .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.value))
        .ok_or_else(|| AnalyticsError::ComputationError("total overflows".to_string()))?;
    let values = records
        .iter()
        .map(|r| to_f64(r.value))
        .collect::<Result<Vec<_>, _>>()?;
    let sorted = series::sorted(&values);

    let count = values.len();
    let total = to_f64(total_exact)?;
    let variance = series::population_variance(&values);

    let result = StatisticsResult {
        mean: ensure_finite("mean", total / count as f64)?,
        median: series::median(&sorted),
        std_deviation: ensure_finite("std_deviation", variance.sqrt())?,
        variance: ensure_finite("variance", variance)?,
        min: sorted[0],
        max: sorted[count - 1],
        total,
        count,
        percentiles: Percentiles {
            p25: series::quantile(&sorted, 0.25),
            p50: series::quantile(&sorted, 0.50),
            p75: series::quantile(&sorted, 0.75),
            p90: series::quantile(&sorted, 0.90),
        },
    };

    tracing::debug!(count, mean = result.mean, "Calculated statistics.");
    Ok(result)
}
