//! End-to-end tests of the HTTP surface, driving the router in-process.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use configuration::Settings;
use serde_json::{json, Value};
use tower::ServiceExt;
use web_server::envelope::{
    Failure, ForecastResponse, RiskMetricsResponse, StatisticsResponse, SummaryResponse,
    TrendsResponse,
};

fn app() -> Router {
    web_server::router(&Settings::default())
}

async fn post(path: &str, body: Value) -> (StatusCode, Value) {
    post_raw(path, body.to_string()).await
}

async fn post_raw(path: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn week_of_transactions() -> Value {
    json!([
        {"amount": 100, "type": "expense", "date": "2024-01-01", "category": "rent"},
        {"amount": 250, "type": "income", "date": "2024-01-02"},
        {"amount": 40, "type": "expense", "date": "2024-01-03"},
        {"amount": 60, "type": "expense", "date": "2024-01-04"},
        {"amount": 300, "type": "income", "date": "2024-01-05"},
    ])
}

#[tokio::test]
async fn statistics_envelope() {
    let (status, body) = post(
        "/api/financial/statistics",
        json!({"transactions": [
            {"amount": 100, "type": "expense", "date": "2024-01-01"},
            {"amount": 50, "type": "income", "date": "2024-01-02"},
        ]}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["statistics"]["percentiles"]["25th"], json!(-62.5));

    let parsed: StatisticsResponse = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.statistics.count, 2);
    assert_eq!(parsed.statistics.mean, -25.0);
    assert_eq!(parsed.statistics.total, -50.0);
}

#[tokio::test]
async fn empty_statistics_are_zero_not_an_error() {
    let (status, body) = post("/api/financial/statistics", json!({"transactions": []})).await;

    assert_eq!(status, StatusCode::OK);
    let parsed: StatisticsResponse = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.statistics.count, 0);
    assert_eq!(parsed.statistics.max, 0.0);
}

#[tokio::test]
async fn trends_with_insufficient_data_return_empty_average() {
    let (status, body) = post(
        "/api/financial/trends",
        json!({"transactions": week_of_transactions(), "window_size": 7}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let parsed: TrendsResponse = serde_json::from_value(body).unwrap();
    assert!(parsed.trends.moving_average.is_empty());
    assert_eq!(parsed.trends.net_values.len(), 5);
}

#[tokio::test]
async fn trends_honour_window_size() {
    let (_, body) = post(
        "/api/financial/trends",
        json!({"transactions": week_of_transactions(), "window_size": 3}),
    )
    .await;

    let parsed: TrendsResponse = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.trends.window_size, 3);
    assert_eq!(parsed.trends.moving_average.len(), 3);
}

#[tokio::test]
async fn risk_metrics_envelope() {
    let (status, body) = post(
        "/api/financial/risk-metrics",
        json!({"transactions": week_of_transactions()}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let parsed: RiskMetricsResponse = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.risk_metrics.total_days, 5);
    assert!(parsed.risk_metrics.max_drawdown <= 0.0);
}

#[tokio::test]
async fn forecast_accepts_monthly_period() {
    let (status, body) = post(
        "/api/financial/forecast",
        json!({
            "transactions": [
                {"amount": 100, "type": "income", "date": "2024-01-15"},
                {"amount": 200, "type": "income", "date": "2024-02-15"},
            ],
            "forecast_days": 60,
            "period": "month"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let parsed: ForecastResponse = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.forecast.forecast_values, vec![300.0, 400.0]);
    assert_eq!(parsed.forecast.trend_slope, 100.0);
}

#[tokio::test]
async fn strict_forecast_reports_insufficient_data() {
    let (status, body) = post(
        "/api/financial/forecast",
        json!({
            "transactions": [{"amount": 100, "type": "income", "date": "2024-01-15"}],
            "strict": true
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let parsed: Failure = serde_json::from_value(body).unwrap();
    assert!(!parsed.success);
}

#[tokio::test]
async fn forecast_horizon_beyond_the_limit_is_a_bad_request() {
    let (status, body) = post(
        "/api/financial/forecast",
        json!({"transactions": week_of_transactions(), "forecast_days": 20_000_000}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn invalid_transaction_is_a_bad_request() {
    let (status, body) = post(
        "/api/financial/statistics",
        json!({"transactions": [{"amount": -3, "type": "expense", "date": "2024-01-01"}]}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("transaction 0"));
}

#[tokio::test]
async fn malformed_json_uses_the_failure_envelope() {
    let (status, body) = post_raw("/api/financial/trends", "{not json".to_string()).await;

    assert!(status.is_client_error());
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn summary_contains_all_views() {
    let (status, body) = post(
        "/api/financial/summary",
        json!({"transactions": week_of_transactions(), "window_size": 2, "forecast_days": 3}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let parsed: SummaryResponse = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.summary.statistics.count, 5);
    assert_eq!(parsed.summary.trends.moving_average.len(), 4);
    assert_eq!(parsed.summary.risk_metrics.total_days, 5);
    assert_eq!(parsed.summary.forecast.forecast_values.len(), 3);
}

#[tokio::test]
async fn health_check() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], json!("healthy"));
}
