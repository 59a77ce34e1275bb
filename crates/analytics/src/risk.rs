use configuration::RiskConfig;
use core_types::AggregatePoint;
use rust_decimal::Decimal;

use crate::error::AnalyticsError;
use crate::report::RiskResult;
use crate::series::{self, ensure_finite, to_f64};

/// Computes risk metrics from the day-over-day returns of a daily aggregate.
///
/// Returns are `(v[i] - v[i-1]) / |v[i-1]|`, skipping steps from zero. With
/// fewer than two points every metric is zero.
pub fn analyze_risk(
    points: &[AggregatePoint],
    config: &RiskConfig,
) -> Result<RiskResult, AnalyticsError> {
    let total_days = points.len();
    if total_days < 2 {
        return Ok(RiskResult {
            total_days,
            ..RiskResult::default()
        });
    }

    let values = series::net_values(points)?;
    let returns = series::relative_changes(&values);

    let mean_return = ensure_finite("mean_return", series::mean(&returns))?;
    let variance = ensure_finite("variance", series::population_variance(&returns))?;
    let std_dev = variance.sqrt();
    let volatility = ensure_finite("volatility", std_dev * config.annualization_factor.sqrt())?;

    let sharpe_ratio = if std_dev > 0.0 {
        ensure_finite("sharpe_ratio", (mean_return - config.risk_free_rate) / std_dev)?
    } else {
        0.0
    };

    let sorted = series::sorted(&returns);
    let value_at_risk_95 = series::quantile(&sorted, 1.0 - config.var_confidence);
    let max_drawdown = max_drawdown(points)?;

    tracing::debug!(
        total_days,
        returns = returns.len(),
        sharpe_ratio,
        max_drawdown,
        "Calculated risk metrics."
    );

    Ok(RiskResult {
        volatility,
        variance,
        mean_return,
        sharpe_ratio,
        value_at_risk_95,
        max_drawdown,
        total_days,
    })
}

/// Largest relative decline of the cumulative net series from its running peak.
///
/// The decline is divided by the magnitude of the peak so the result is never
/// positive, including when every cumulative value is negative. Points whose
/// running peak is exactly zero contribute nothing.
pub fn max_drawdown(points: &[AggregatePoint]) -> Result<f64, AnalyticsError> {
    let Some(first) = points.first() else {
        return Ok(0.0);
    };

    let mut cumulative = Decimal::ZERO;
    let mut peak = first.net_value;
    let mut worst = 0.0_f64;

    for point in points {
        cumulative = cumulative
            .checked_add(point.net_value)
            .ok_or_else(|| overflow("cumulative net value", point.date))?;
        if cumulative > peak {
            peak = cumulative;
        }
        if peak.is_zero() {
            continue;
        }
        let decline = cumulative
            .checked_sub(peak)
            .ok_or_else(|| overflow("drawdown", point.date))?;
        let drawdown = to_f64(decline)? / to_f64(peak.abs())?;
        if drawdown < worst {
            worst = drawdown;
        }
    }

    ensure_finite("max_drawdown", worst)
}

fn overflow(what: &str, date: chrono::NaiveDate) -> AnalyticsError {
    AnalyticsError::ComputationError(format!("{} at {} overflows", what, date))
}
