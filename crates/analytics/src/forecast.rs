use configuration::ForecastConfig;
use core_types::{AggregatePoint, Period, SignedRecord};

use crate::aggregate;
use crate::error::AnalyticsError;
use crate::report::ForecastResult;
use crate::series::{self, ensure_finite};

/// The fitted line `value = slope * index + intercept` over a zero-based period index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    pub fn at(&self, index: usize) -> f64 {
        self.slope * index as f64 + self.intercept
    }
}

/// Ordinary least squares fit of `values` against `0..n`.
///
/// Returns `None` for fewer than two values, where the slope is undefined.
pub fn fit_linear_trend(values: &[f64]) -> Option<LinearTrend> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = series::mean(values);
    let (sxy, sxx) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sxy, sxx), (i, y)| {
            let dx = i as f64 - x_mean;
            (sxy + dx * (y - y_mean), sxx + dx * dx)
        });

    let slope = sxy / sxx;
    Some(LinearTrend {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

/// Buckets `records` by the configured period and projects the trend forward.
///
/// `horizon_days` is converted to whole periods. With fewer than two periods
/// the forecast is flat at the only value seen (or zero), unless `strict` is
/// set, in which case the call fails with `InsufficientData`.
pub fn forecast(
    records: &[SignedRecord],
    config: &ForecastConfig,
) -> Result<ForecastResult, AnalyticsError> {
    let points = aggregate::aggregate(records, config.period)?;
    let horizon = config.period.periods_in_days(config.horizon_days);
    project(&points, config.period, horizon, config.strict)
}

/// Fits and projects an already-aggregated series for `horizon` periods.
pub fn project(
    points: &[AggregatePoint],
    period: Period,
    horizon: usize,
    strict: bool,
) -> Result<ForecastResult, AnalyticsError> {
    let values = series::net_values(points)?;
    let n = values.len();

    let trend = match fit_linear_trend(&values) {
        Some(trend) => LinearTrend {
            slope: ensure_finite("trend_slope", trend.slope)?,
            intercept: ensure_finite("trend_intercept", trend.intercept)?,
        },
        None if strict => {
            return Err(AnalyticsError::InsufficientData(format!(
                "forecasting needs at least 2 {} periods, got {}",
                period, n
            )));
        }
        None => LinearTrend {
            slope: 0.0,
            intercept: values.first().copied().unwrap_or(0.0),
        },
    };

    let forecast_values = (0..horizon)
        .map(|j| ensure_finite("forecast_value", trend.at(n + j)))
        .collect::<Result<Vec<_>, _>>()?;
    let forecast_periods = forecast_periods(points, period, horizon)?;

    tracing::debug!(
        %period,
        periods = n,
        horizon,
        slope = trend.slope,
        "Calculated forecast."
    );

    Ok(ForecastResult {
        period,
        historical_periods: points.iter().map(|p| p.date).collect(),
        historical_values: values,
        forecast_periods,
        forecast_values,
        trend_slope: trend.slope,
        trend_intercept: trend.intercept,
    })
}

/// The periods following the last observed one. Empty when nothing was observed.
fn forecast_periods(
    points: &[AggregatePoint],
    period: Period,
    horizon: usize,
) -> Result<Vec<chrono::NaiveDate>, AnalyticsError> {
    let Some(last) = points.last() else {
        return Ok(Vec::new());
    };

    (1..=horizon)
        .map(|step| {
            u32::try_from(step)
                .ok()
                .and_then(|step| period.advance(last.date, step))
                .ok_or_else(|| {
                    AnalyticsError::ComputationError(format!(
                        "forecast period {} after {} is out of calendar range",
                        step, last.date
                    ))
                })
        })
        .collect()
}
