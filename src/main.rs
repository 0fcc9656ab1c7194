use tickstats::config::Config;
use tickstats::{app, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tickstats=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Starting tickstats (max {} symbols, batches up to {} samples)",
        config.limits.max_symbols, config.limits.max_batch_size
    );

    let addr = config.bind_addr();
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Tickstats server listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}
