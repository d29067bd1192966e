use crate::error::AppError;
use crate::models::CreateCompetitorRequest;
use crate::state::AppState;
use axum::{Json, extract::State};
use types::competitor::Competitor;
use types::events::RankingEvent;
use types::ids::CompetitorId;

pub async fn create_competitor(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompetitorRequest>,
) -> Result<Json<Competitor>, AppError> {
    // 1. Validate: id is required and non-empty
    let id = payload
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("id is required".to_string()))?;

    // 2. Resolve the initial rating before taking the id
    let rating = payload
        .rating
        .unwrap_or_else(|| state.store.default_initial_rating());

    // 3. Create; a taken id surfaces as 409
    let competitor = state.store.create(CompetitorId::new(id), rating)?;

    // 4. Announce the newcomer to connected observers
    state.broker.publish(&RankingEvent::PlayerCreated {
        competitor: competitor.clone(),
    });

    Ok(Json(competitor))
}
