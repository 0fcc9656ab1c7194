use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned to callers for any fault that is not a validation error.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Errors raised by the statistics engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Symbol not found")]
    SymbolNotFound,

    #[error("Unique symbols size exceeded. Batch rejected")]
    SymbolCapacityExceeded,

    #[error("Single batch size cannot exceed {max}")]
    BatchTooLarge { max: usize },

    #[error("Invalid kLevel: {0}")]
    InvalidLevel(i64),

    #[error("Insufficient data for k={level}; at least {required} data needed")]
    InsufficientData { level: usize, required: usize },

    #[error("Invalid sample at index {index}: {value}")]
    InvalidSample { index: usize, value: f64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StatsError {
    /// Whether this error was caused by caller input rather than an internal fault.
    pub fn is_validation(&self) -> bool {
        !matches!(self, StatsError::Internal(_))
    }
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        if err.is_validation() {
            AppError::BadRequest(err.to_string())
        } else {
            tracing::error!("Stats engine fault: {}", err);
            AppError::Internal(INTERNAL_ERROR_MESSAGE.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!("Blocking task failed: {}", err);
        AppError::Internal(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Anyhow(e) => {
                tracing::error!("Unhandled error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Result type for the statistics engine.
pub type StatsResult<T> = std::result::Result<T, StatsError>;
