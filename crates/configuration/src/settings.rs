use core_types::Period;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an empty file (or no file at all) yields a
/// working configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub analytics: AnalyticsConfig,
}

/// Contains parameters for the HTTP transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Upper bound on a request body, in bytes.
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            body_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            ConfigError::ValidationError(format!("server.host '{}' is not an IP address", self.host))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive, used when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// Every tunable of the analytics engine. Passed explicitly to each calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub trend: TrendConfig,
    pub risk: RiskConfig,
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Number of consecutive aggregate entries in each moving-average window.
    pub window_size: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self { window_size: 7 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Confidence level of the Value-at-Risk figure (0.95 reports the 5th percentile).
    pub var_confidence: f64,
    /// Per-period risk-free rate subtracted from the mean return in the Sharpe ratio.
    pub risk_free_rate: f64,
    /// Periods per year used to scale volatility. 1.0 leaves it per-period.
    pub annualization_factor: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            var_confidence: 0.95,
            risk_free_rate: 0.0,
            annualization_factor: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Forecast horizon in days; converted to whole periods of `period`.
    pub horizon_days: usize,
    pub period: Period,
    /// Fail with insufficient data instead of producing a flat forecast.
    pub strict: bool,
    /// Upper bound accepted for `horizon_days`, including per-request overrides.
    pub max_horizon_days: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            period: Period::Day,
            strict: false,
            max_horizon_days: 3650,
        }
    }
}

impl Settings {
    /// Checks that every value is inside its meaningful range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.socket_addr()?;
        if self.server.body_limit_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.body_limit_bytes must be greater than 0".to_string(),
            ));
        }
        self.analytics.validate()
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trend.window_size == 0 {
            return Err(ConfigError::ValidationError(
                "analytics.trend.window_size must be at least 1".to_string(),
            ));
        }
        let risk = &self.risk;
        if !(risk.var_confidence > 0.0 && risk.var_confidence < 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "analytics.risk.var_confidence must be between 0 and 1, got {}",
                risk.var_confidence
            )));
        }
        if !risk.risk_free_rate.is_finite() {
            return Err(ConfigError::ValidationError(
                "analytics.risk.risk_free_rate must be finite".to_string(),
            ));
        }
        if !(risk.annualization_factor.is_finite() && risk.annualization_factor > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "analytics.risk.annualization_factor must be positive, got {}",
                risk.annualization_factor
            )));
        }
        let forecast = &self.forecast;
        if forecast.horizon_days > forecast.max_horizon_days {
            return Err(ConfigError::ValidationError(format!(
                "analytics.forecast.horizon_days must be at most {}, got {}",
                forecast.max_horizon_days, forecast.horizon_days
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.analytics.trend.window_size, 7);
        assert_eq!(settings.analytics.forecast.horizon_days, 30);
        assert_eq!(settings.server.socket_addr().unwrap().port(), 5001);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = AnalyticsConfig::default();
        config.trend.window_size = 0;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.risk.var_confidence = 1.0;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.risk.annualization_factor = 0.0;
        assert!(config.validate().is_err());

        let mut config = AnalyticsConfig::default();
        config.forecast.horizon_days = config.forecast.max_horizon_days;
        assert!(config.validate().is_ok());
        config.forecast.horizon_days += 1;
        assert!(config.validate().is_err());

        let mut settings = Settings::default();
        settings.server.host = "localhost:80".to_string();
        assert!(settings.validate().is_err());
    }
}
