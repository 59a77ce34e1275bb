//! Request bodies and the success/failure envelopes returned by every route.

use analytics::{
    AnalyticsSummary, ForecastResult, Overrides, RiskResult, StatisticsResult, TrendResult,
};
use core_types::RawTransaction;
use serde::{Deserialize, Serialize};

/// The body accepted by every analytics route. Parameters that a route does
/// not use are ignored; omitted ones fall back to the configured defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalyticsRequest {
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
    #[serde(flatten)]
    pub overrides: Overrides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub success: bool,
    pub error: String,
}

impl Failure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub success: bool,
    pub statistics: StatisticsResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendsResponse {
    pub success: bool,
    pub trends: TrendResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetricsResponse {
    pub success: bool,
    pub risk_metrics: RiskResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub success: bool,
    pub forecast: ForecastResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub summary: AnalyticsSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}
