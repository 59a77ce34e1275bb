use core_types::{AggregatePoint, Period, SignedRecord};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::AnalyticsError;

/// Sums signed values per period, ordered by period.
///
/// Only periods that contain at least one record appear; gaps are not filled
/// with zeros, so consecutive points may be more than one period apart.
/// A period whose sum leaves the decimal range is a `ComputationError`.
pub fn aggregate(
    records: &[SignedRecord],
    period: Period,
) -> Result<Vec<AggregatePoint>, AnalyticsError> {
    let mut buckets: BTreeMap<_, Decimal> = BTreeMap::new();
    for record in records {
        let date = period.bucket(record.date);
        let sum = buckets.entry(date).or_default();
        *sum = sum.checked_add(record.value).ok_or_else(|| {
            AnalyticsError::ComputationError(format!("net value for {} overflows", date))
        })?;
    }

    Ok(buckets
        .into_iter()
        .map(|(date, net_value)| AggregatePoint { date, net_value })
        .collect())
}

/// The daily aggregate used by the trend and risk calculators.
pub fn daily(records: &[SignedRecord]) -> Result<Vec<AggregatePoint>, AnalyticsError> {
    aggregate(records, Period::Day)
}
