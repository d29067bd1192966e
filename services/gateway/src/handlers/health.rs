use crate::models::HealthResponse;
use axum::Json;

/// Liveness probe: always `{"ok": true}` once serving.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
