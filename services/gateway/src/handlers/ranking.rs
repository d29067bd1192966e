use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use types::competitor::Competitor;

/// Full ladder, descending by rating.
pub async fn list_ranking(State(state): State<AppState>) -> Json<Vec<Competitor>> {
    Json(state.store.ranking())
}

/// Persistent event stream (SSE). Each message is one JSON `RankingEvent`.
///
/// The subscription only carries events published from this point on;
/// clients pull `GET /ranking` for the current state before merging the
/// stream. Dropping the connection deregisters the subscriber.
pub async fn ranking_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let subscription = state.broker.subscribe();
    let stream =
        subscription.map(|event| Event::default().event("message").json_data(&event));
    Sse::new(stream).keep_alive(KeepAlive::default())
}
