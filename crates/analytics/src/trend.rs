use configuration::TrendConfig;
use core_types::AggregatePoint;

use crate::error::AnalyticsError;
use crate::report::TrendResult;
use crate::series::{self, ensure_finite};

/// Computes the moving average and day-over-day growth of a daily aggregate.
///
/// With fewer points than `window_size` the moving average is empty, meaning
/// "not computable". Growth is expressed in percent; steps from a zero value
/// are left out.
pub fn analyze_trend(
    points: &[AggregatePoint],
    config: &TrendConfig,
) -> Result<TrendResult, AnalyticsError> {
    let window = config.window_size;
    if window == 0 {
        return Err(AnalyticsError::InvalidInput(
            "window_size must be at least 1".to_string(),
        ));
    }

    let values = series::net_values(points)?;

    let moving_average: Vec<f64> = values.windows(window).map(series::mean).collect();
    let dates = points
        .iter()
        .skip(window - 1)
        .map(|p| p.date)
        .collect::<Vec<_>>();

    let growth: Vec<f64> = series::relative_changes(&values)
        .into_iter()
        .map(|change| change * 100.0)
        .collect();
    let average_growth_rate = ensure_finite("average_growth_rate", series::mean(&growth))?;
    let volatility = ensure_finite("volatility", series::population_variance(&growth).sqrt())?;

    tracing::debug!(
        points = points.len(),
        window,
        averaged = moving_average.len(),
        "Calculated trend."
    );

    Ok(TrendResult {
        window_size: window,
        dates,
        moving_average,
        net_values: values,
        average_growth_rate,
        volatility,
    })
}
