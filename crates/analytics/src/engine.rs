use configuration::AnalyticsConfig;
use core_types::{Period, RawTransaction, SignedRecord};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::aggregate;
use crate::error::AnalyticsError;
use crate::forecast;
use crate::normalizer::normalize;
use crate::report::{AnalyticsSummary, ForecastResult, RiskResult, StatisticsResult, TrendResult};
use crate::risk;
use crate::statistics;
use crate::trend;

/// Per-call replacements for configured tunables. `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overrides {
    pub window_size: Option<usize>,
    pub forecast_days: Option<usize>,
    pub period: Option<Period>,
    pub strict: Option<bool>,
    pub risk_free_rate: Option<f64>,
}

/// A stateless calculator for deriving analytics from a list of transactions.
///
/// Each operation normalizes its own input and is independent of the others:
/// one failing does not affect calls to the rest.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Applies `overrides` to the engine's configuration and validates the result.
    pub fn resolve(&self, overrides: &Overrides) -> Result<AnalyticsConfig, AnalyticsError> {
        let mut config = self.config.clone();
        if let Some(window_size) = overrides.window_size {
            config.trend.window_size = window_size;
        }
        if let Some(days) = overrides.forecast_days {
            config.forecast.horizon_days = days;
        }
        if let Some(period) = overrides.period {
            config.forecast.period = period;
        }
        if let Some(strict) = overrides.strict {
            config.forecast.strict = strict;
        }
        if let Some(rate) = overrides.risk_free_rate {
            config.risk.risk_free_rate = rate;
        }

        config
            .validate()
            .map_err(|e| AnalyticsError::InvalidInput(e.to_string()))?;
        Ok(config)
    }

    pub fn compute_statistics(
        &self,
        transactions: &[RawTransaction],
    ) -> Result<StatisticsResult, AnalyticsError> {
        let records = normalize(transactions)?;
        statistics::calculate_statistics(&records)
    }

    pub fn compute_trends(
        &self,
        transactions: &[RawTransaction],
        overrides: &Overrides,
    ) -> Result<TrendResult, AnalyticsError> {
        let config = self.resolve(overrides)?;
        let records = normalize(transactions)?;
        trend::analyze_trend(&aggregate::daily(&records)?, &config.trend)
    }

    pub fn compute_risk_metrics(
        &self,
        transactions: &[RawTransaction],
        overrides: &Overrides,
    ) -> Result<RiskResult, AnalyticsError> {
        let config = self.resolve(overrides)?;
        let records = normalize(transactions)?;
        risk::analyze_risk(&aggregate::daily(&records)?, &config.risk)
    }

    pub fn compute_forecast(
        &self,
        transactions: &[RawTransaction],
        overrides: &Overrides,
    ) -> Result<ForecastResult, AnalyticsError> {
        let config = self.resolve(overrides)?;
        let records = normalize(transactions)?;
        forecast::forecast(&records, &config.forecast)
    }

    /// Computes all four views, running the calculators concurrently on the
    /// blocking pool against one shared copy of the normalized records.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn compute_summary(
        &self,
        transactions: &[RawTransaction],
        overrides: &Overrides,
    ) -> Result<AnalyticsSummary, AnalyticsError> {
        let config = self.resolve(overrides)?;
        let records = Arc::new(normalize(transactions)?);

        let trend_config = config.trend.clone();
        let risk_config = config.risk.clone();
        let forecast_config = config.forecast.clone();

        let (statistics, trends, risk_metrics, forecast) = futures::try_join!(
            run_blocking(records.clone(), statistics::calculate_statistics),
            run_blocking(records.clone(), move |r| {
                trend::analyze_trend(&aggregate::daily(r)?, &trend_config)
            }),
            run_blocking(records.clone(), move |r| {
                risk::analyze_risk(&aggregate::daily(r)?, &risk_config)
            }),
            run_blocking(records, move |r| forecast::forecast(r, &forecast_config)),
        )?;

        Ok(AnalyticsSummary {
            statistics,
            trends,
            risk_metrics,
            forecast,
        })
    }
}

async fn run_blocking<T, F>(records: Arc<Vec<SignedRecord>>, calculate: F) -> Result<T, AnalyticsError>
where
    T: Send + 'static,
    F: FnOnce(&[SignedRecord]) -> Result<T, AnalyticsError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || calculate(records.as_slice()))
        .await
        .map_err(|e| AnalyticsError::ComputationError(format!("calculation task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn transactions(value: serde_json::Value) -> Vec<RawTransaction> {
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> Vec<RawTransaction> {
        transactions(json!([
            {"amount": 100, "type": "expense", "date": "2024-01-01"},
            {"amount": 50, "type": "income", "date": "2024-01-02"},
            {"amount": 20, "type": "income", "date": "2024-01-02 18:30:00"},
            {"amount": 35.5, "type": "expense", "date": "2024-01-04"},
        ]))
    }

    #[test]
    fn statistics_over_signed_amounts() {
        let engine = AnalyticsEngine::default();
        let raw = transactions(json!([
            {"amount": 100, "type": "expense", "date": "2024-01-01"},
            {"amount": 50, "type": "income", "date": "2024-01-02"},
        ]));
        let stats = engine.compute_statistics(&raw).unwrap();

        assert_eq!(stats.count, 2);
        assert_relative_eq!(stats.mean, -25.0);
        assert_relative_eq!(stats.median, -25.0);
        assert_relative_eq!(stats.total, -50.0);
    }

    #[test]
    fn trends_use_daily_aggregate() {
        let engine = AnalyticsEngine::default();
        let overrides = Overrides {
            window_size: Some(2),
            ..Overrides::default()
        };
        let trends = engine.compute_trends(&sample(), &overrides).unwrap();

        assert_eq!(trends.net_values, vec![-100.0, 70.0, -35.5]);
        assert_eq!(trends.moving_average, vec![-15.0, 17.25]);
        assert_eq!(trends.window_size, 2);
    }

    #[test]
    fn invalid_override_is_invalid_input() {
        let engine = AnalyticsEngine::default();
        let overrides = Overrides {
            window_size: Some(0),
            ..Overrides::default()
        };
        assert!(matches!(
            engine.compute_trends(&sample(), &overrides),
            Err(AnalyticsError::InvalidInput(_))
        ));
    }

    #[test]
    fn oversized_forecast_horizon_is_rejected_before_projecting() {
        let engine = AnalyticsEngine::default();
        let overrides = Overrides {
            forecast_days: Some(20_000_000),
            ..Overrides::default()
        };
        assert!(matches!(
            engine.compute_forecast(&sample(), &overrides),
            Err(AnalyticsError::InvalidInput(_))
        ));

        let longest = Overrides {
            forecast_days: Some(3650),
            ..Overrides::default()
        };
        let result = engine.compute_forecast(&sample(), &longest).unwrap();
        assert_eq!(result.forecast_values.len(), 3650);
    }

    #[test]
    fn invalid_transaction_fails_every_operation() {
        let engine = AnalyticsEngine::default();
        let raw = transactions(json!([{"amount": 5, "type": "gift", "date": "2024-01-01"}]));
        let none = Overrides::default();

        assert!(engine.compute_statistics(&raw).is_err());
        assert!(engine.compute_trends(&raw, &none).is_err());
        assert!(engine.compute_risk_metrics(&raw, &none).is_err());
        assert!(engine.compute_forecast(&raw, &none).is_err());
    }

    #[test]
    fn strict_forecast_override() {
        let engine = AnalyticsEngine::default();
        let raw = transactions(json!([{"amount": 5, "type": "income", "date": "2024-01-01"}]));

        let lenient = engine.compute_forecast(&raw, &Overrides::default()).unwrap();
        assert_eq!(lenient.forecast_values, vec![5.0; 30]);

        let strict = Overrides {
            strict: Some(true),
            ..Overrides::default()
        };
        assert!(matches!(
            engine.compute_forecast(&raw, &strict),
            Err(AnalyticsError::InsufficientData(_))
        ));
    }

    #[tokio::test]
    async fn summary_matches_individual_operations() {
        let engine = AnalyticsEngine::default();
        let none = Overrides::default();
        let raw = sample();

        let summary = engine.compute_summary(&raw, &none).await.unwrap();

        assert_eq!(summary.statistics, engine.compute_statistics(&raw).unwrap());
        assert_eq!(summary.trends, engine.compute_trends(&raw, &none).unwrap());
        assert_eq!(summary.risk_metrics, engine.compute_risk_metrics(&raw, &none).unwrap());
        assert_eq!(summary.forecast, engine.compute_forecast(&raw, &none).unwrap());
    }

    #[tokio::test]
    async fn summary_of_nothing_is_all_defaults() {
        let engine = AnalyticsEngine::default();
        let summary = engine.compute_summary(&[], &Overrides::default()).await.unwrap();

        assert_eq!(summary.statistics.count, 0);
        assert!(summary.trends.moving_average.is_empty());
        assert_eq!(summary.risk_metrics.total_days, 0);
        assert_eq!(summary.forecast.forecast_values, vec![0.0; 30]);
    }
}
