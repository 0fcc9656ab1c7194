use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Number of symbols currently tracked.
    symbols: usize,
    max_symbols: usize,
    max_batch_size: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        symbols: state.stats.symbol_count(),
        max_symbols: state.config.limits.max_symbols,
        max_batch_size: state.config.limits.max_batch_size,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, StatsLimits};

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "ok",
            version: "1.0.0",
            symbols: 3,
            max_symbols: 10,
            max_batch_size: 10_000,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert!(json.contains("\"symbols\":3"));
        assert!(json.contains("\"max_batch_size\":10000"));
    }

    #[tokio::test]
    async fn test_health_reports_configured_limits() {
        let state = AppState::new(Config {
            limits: StatsLimits {
                max_symbols: 3,
                max_batch_size: 50,
            },
            ..Config::default()
        });

        let Json(response) = health(State(state)).await;
        assert_eq!(response.max_symbols, 3);
        assert_eq!(response.max_batch_size, 50);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let state = AppState::new(Config::default());
        state.stats.add_batch("BTC", &[1.0]).unwrap();

        let Json(response) = health(State(state)).await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(response.symbols, 1);
    }
}
