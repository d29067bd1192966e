use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use types::errors::RankingError;

/// Central error type for the gateway application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("unknown competitor: {0}")]
    UnknownCompetitor(String),

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl From<RankingError> for AppError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::InvalidRequest(msg) => AppError::InvalidRequest(msg),
            RankingError::AlreadyExists { id } => AppError::AlreadyExists(id.to_string()),
            RankingError::UnknownCompetitor { id } => AppError::UnknownCompetitor(id.to_string()),
            RankingError::Journal { message } => {
                AppError::Internal(anyhow::anyhow!("journal: {message}"))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code) = match self {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg, "INVALID_REQUEST"),
            AppError::AlreadyExists(msg) => (StatusCode::CONFLICT, msg, "ALREADY_EXISTS"),
            // Distinct from 400: the request was well-formed but referenced
            // a competitor that does not exist.
            AppError::UnknownCompetitor(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg, "UNKNOWN_COMPETITOR")
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": error_message
        }));

        (status, body).into_response()
    }
}
