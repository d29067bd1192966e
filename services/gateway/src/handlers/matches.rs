use crate::error::AppError;
use crate::models::ReportMatchRequest;
use crate::state::AppState;
use axum::{Json, extract::State};
use types::ids::CompetitorId;
use types::matches::MatchReport;

pub async fn report_match(
    State(state): State<AppState>,
    Json(payload): Json<ReportMatchRequest>,
) -> Result<Json<MatchReport>, AppError> {
    let (Some(winner), Some(loser)) = (payload.winner, payload.loser) else {
        return Err(AppError::InvalidRequest(
            "winner and loser are required".to_string(),
        ));
    };

    // The processor owns the rest of the validation chain and the
    // commit-then-broadcast ordering.
    let report = state.processor.report_match(
        &CompetitorId::new(winner),
        &CompetitorId::new(loser),
        payload.draw,
    )?;

    Ok(Json(report))
}
