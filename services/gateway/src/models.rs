use serde::{Deserialize, Serialize};

/// Body of `POST /competitor`. `rating` falls back to the store's current
/// rounded-mean default when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompetitorRequest {
    pub id: Option<String>,
    pub rating: Option<i32>,
}

/// Body of `POST /match`. Missing participants are a 400; `draw` defaults
/// to false.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportMatchRequest {
    pub winner: Option<String>,
    pub loser: Option<String>,
    #[serde(default)]
    pub draw: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}
