use chrono::NaiveDate;
use core_types::Period;
use serde::{Deserialize, Serialize};

/// Descriptive statistics over the signed transaction values.
///
/// Every field is defined for every input; an empty input yields all zeros so
/// renderers can rely on the object existing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResult {
    pub mean: f64,
    pub median: f64,
    pub std_deviation: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub total: f64,
    pub count: usize,
    pub percentiles: Percentiles,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    #[serde(rename = "25th")]
    pub p25: f64,
    #[serde(rename = "50th")]
    pub p50: f64,
    #[serde(rename = "75th")]
    pub p75: f64,
    #[serde(rename = "90th")]
    pub p90: f64,
}

/// Moving average and growth of the daily net series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub window_size: usize,
    /// End date of each moving-average window, aligned with `moving_average`.
    pub dates: Vec<NaiveDate>,
    /// Empty when there are fewer aggregate entries than `window_size`.
    pub moving_average: Vec<f64>,
    pub net_values: Vec<f64>,
    /// Mean day-over-day change, in percent.
    pub average_growth_rate: f64,
    /// Population standard deviation of the day-over-day change, in percent.
    pub volatility: f64,
}

/// Risk metrics derived from the day-over-day return series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskResult {
    pub volatility: f64,
    pub variance: f64,
    pub mean_return: f64,
    pub sharpe_ratio: f64,
    pub value_at_risk_95: f64,
    /// Largest peak-to-trough decline of the cumulative net series, as a non-positive fraction.
    pub max_drawdown: f64,
    pub total_days: usize,
}

/// A linear-trend projection of the per-period net series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub period: Period,
    pub historical_periods: Vec<NaiveDate>,
    pub historical_values: Vec<f64>,
    pub forecast_periods: Vec<NaiveDate>,
    pub forecast_values: Vec<f64>,
    pub trend_slope: f64,
    pub trend_intercept: f64,
}

/// All four views computed from the same input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub statistics: StatisticsResult,
    pub trends: TrendResult,
    pub risk_metrics: RiskResult,
    pub forecast: ForecastResult,
}
