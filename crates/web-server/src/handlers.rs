use crate::envelope::{
    AnalyticsRequest, ForecastResponse, HealthResponse, RiskMetricsResponse, StatisticsResponse,
    SummaryResponse, TrendsResponse,
};
use crate::{error::AppError, AppState};
use analytics::{AnalyticsEngine, AnalyticsError};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

/// Runs one calculation on the blocking pool so large bodies do not stall the
/// async workers.
async fn on_blocking_pool<T, F>(state: Arc<AppState>, calculate: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&AnalyticsEngine) -> Result<T, AnalyticsError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || calculate(&state.engine))
        .await
        .map_err(|e| AnalyticsError::ComputationError(format!("calculation task failed: {}", e)))?;
    Ok(result?)
}

/// Unwraps the request body, turning a malformed one into the failure envelope.
fn body(payload: Result<Json<AnalyticsRequest>, JsonRejection>) -> Result<AnalyticsRequest, AppError> {
    match payload {
        Ok(Json(request)) => {
            tracing::debug!(transactions = request.transactions.len(), "Analytics request received.");
            Ok(request)
        }
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected request body.");
            Err(AppError::BadRequest(rejection.status(), rejection.body_text()))
        }
    }
}

/// # POST /api/financial/statistics
pub async fn calculate_statistics(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyticsRequest>, JsonRejection>,
) -> Result<Json<StatisticsResponse>, AppError> {
    let request = body(payload)?;
    let statistics =
        on_blocking_pool(state, move |engine| engine.compute_statistics(&request.transactions))
            .await?;
    Ok(Json(StatisticsResponse {
        success: true,
        statistics,
    }))
}

/// # POST /api/financial/trends
/// Accepts an optional `window_size` (default from configuration, 7).
pub async fn calculate_trends(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyticsRequest>, JsonRejection>,
) -> Result<Json<TrendsResponse>, AppError> {
    let request = body(payload)?;
    let trends = on_blocking_pool(state, move |engine| {
        engine.compute_trends(&request.transactions, &request.overrides)
    })
    .await?;
    Ok(Json(TrendsResponse {
        success: true,
        trends,
    }))
}

/// # POST /api/financial/risk-metrics
/// Accepts an optional per-period `risk_free_rate`.
pub async fn calculate_risk_metrics(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyticsRequest>, JsonRejection>,
) -> Result<Json<RiskMetricsResponse>, AppError> {
    let request = body(payload)?;
    let risk_metrics = on_blocking_pool(state, move |engine| {
        engine.compute_risk_metrics(&request.transactions, &request.overrides)
    })
    .await?;
    Ok(Json(RiskMetricsResponse {
        success: true,
        risk_metrics,
    }))
}

/// # POST /api/financial/forecast
/// Accepts optional `forecast_days`, `period` ("day" or "month") and `strict`.
pub async fn forecast_budget(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyticsRequest>, JsonRejection>,
) -> Result<Json<ForecastResponse>, AppError> {
    let request = body(payload)?;
    let forecast = on_blocking_pool(state, move |engine| {
        engine.compute_forecast(&request.transactions, &request.overrides)
    })
    .await?;
    Ok(Json(ForecastResponse {
        success: true,
        forecast,
    }))
}

/// # POST /api/financial/summary
/// All four views in one response, computed concurrently.
pub async fn calculate_summary(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyticsRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, AppError> {
    let request = body(payload)?;
    let summary = state
        .engine
        .compute_summary(&request.transactions, &request.overrides)
        .await?;
    Ok(Json(SummaryResponse {
        success: true,
        summary,
    }))
}

/// # GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "Fintrack Financial Analytics Service".to_string(),
    })
}
