use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not enough data to perform calculation: {0}")]
    InsufficientData(String),

    #[error("An unexpected error occurred during analytics calculation: {0}")]
    ComputationError(String),
}

impl From<CoreError> for AnalyticsError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidInput(field, reason) => {
                AnalyticsError::InvalidInput(format!("{}: {}", field, reason))
            }
        }
    }
}
