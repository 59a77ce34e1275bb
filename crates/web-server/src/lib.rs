use analytics::AnalyticsEngine;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use configuration::Settings;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod envelope;
pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: AnalyticsEngine,
}

/// Builds the application router with its middleware stack.
pub fn router(settings: &Settings) -> Router {
    let app_state = Arc::new(AppState {
        engine: AnalyticsEngine::new(settings.analytics.clone()),
    });

    // The front end is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/financial/statistics", post(handlers::calculate_statistics))
        .route("/api/financial/trends", post(handlers::calculate_trends))
        .route("/api/financial/risk-metrics", post(handlers::calculate_risk_metrics))
        .route("/api/financial/forecast", post(handlers::forecast_budget))
        .route("/api/financial/summary", post(handlers::calculate_summary))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(settings.server.body_limit_bytes))
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialised by the caller. Returns after a
/// Ctrl-C triggered graceful shutdown.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let addr = settings.server.socket_addr()?;
    let app = router(&settings);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server started and listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received.");
}
