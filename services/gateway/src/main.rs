mod config;
mod error;
mod handlers;
mod models;
mod router;
mod state;

use std::sync::Arc;

use config::GatewayConfig;
use ranking_engine::{RatingStore, SubscriptionBroker};
use router::create_router;
use state::AppState;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting ranking gateway service");

    let config = GatewayConfig::from_env()?;

    // The store and broker are owned here: constructed at startup, dropped
    // at shutdown. Nothing in the pipeline is a process-wide singleton.
    let store = match &config.journal_path {
        Some(path) => Arc::new(RatingStore::open(path)?),
        None => Arc::new(RatingStore::in_memory()),
    };
    tracing::info!(
        competitors = store.competitor_count(),
        matches = store.match_count(),
        "rating store ready"
    );

    let broker = Arc::new(SubscriptionBroker::new(config.event_queue_capacity));
    let state = AppState::new(store, broker);

    // Create router
    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
