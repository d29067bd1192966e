use crate::handlers::{competitor, health, matches, ranking};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/competitor", post(competitor::create_competitor))
        .route("/match", post(matches::report_match))
        .route("/ranking", get(ranking::list_ranking))
        .route("/ranking/events", get(ranking::ranking_events))
        .route("/health", get(health::health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
