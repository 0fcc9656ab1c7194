//! Tickstats - rolling per-symbol trading statistics over cascading sample windows

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

use axum::Router;
use config::Config;
use services::TradingStatsService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub stats: Arc<TradingStatsService>,
}

impl AppState {
    /// Build fresh state from configuration.
    pub fn new(config: Config) -> Self {
        Self {
            stats: TradingStatsService::new(config.limits),
            config: Arc::new(config),
        }
    }
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Re-export commonly used types
pub use error::{AppError, StatsError};
pub use types::*;
