pub mod health;
pub mod stats;

use crate::error::AppError;
use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(stats::router())
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
