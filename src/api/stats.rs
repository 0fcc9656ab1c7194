use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::types::{AddBatchRequest, StatsQuery, TradingStats};
use crate::AppState;

/// Body returned when a batch is accepted.
pub const BATCH_ACCEPTED: &str = "Batch added successfully.";

/// POST /add_batch/
async fn add_batch(
    State(state): State<AppState>,
    Json(request): Json<AddBatchRequest>,
) -> Result<&'static str> {
    let service = state.stats.clone();
    tokio::task::spawn_blocking(move || service.add_batch(&request.symbol, &request.values))
        .await??;
    Ok(BATCH_ACCEPTED)
}

/// GET /stats/?symbol=..&k=..
async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<TradingStats>> {
    let service = state.stats.clone();
    let stats =
        tokio::task::spawn_blocking(move || service.calculate_stats(&query.symbol, query.k))
            .await??;
    Ok(Json(stats))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add_batch/", post(add_batch))
        .route("/add_batch", post(add_batch))
        .route("/stats/", get(get_stats))
        .route("/stats", get(get_stats))
}
