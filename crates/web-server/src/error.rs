use analytics::AnalyticsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::envelope::Failure;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("Malformed request: {1}")]
    BadRequest(StatusCode, String),
}

/// Converts our custom `AppError` into an HTTP response carrying the failure envelope.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Analytics(AnalyticsError::InvalidInput(message)) => {
                (StatusCode::BAD_REQUEST, message)
            }
            AppError::Analytics(AnalyticsError::InsufficientData(message)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            AppError::Analytics(err @ AnalyticsError::ComputationError(_)) => {
                tracing::error!(error = ?err, "Analytics computation failed.");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            AppError::BadRequest(status, message) => (status, message),
        };

        (status, Json(Failure::new(error_message))).into_response()
    }
}
