//! Error types for the ranking pipeline
//!
//! Server-side taxonomy using thiserror. Every variant is scoped to the
//! offending request; nothing here is process-fatal.

use thiserror::Error;

use crate::ids::CompetitorId;

/// Top-level ranking error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RankingError {
    /// Malformed input: missing or empty required fields.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Competitor id already taken.
    #[error("competitor already exists: {id}")]
    AlreadyExists { id: CompetitorId },

    /// A match referenced a competitor id that is not in the store.
    /// Distinct from `InvalidRequest`: the request was well-formed, the
    /// referenced entity does not exist.
    #[error("unknown competitor: {id}")]
    UnknownCompetitor { id: CompetitorId },

    /// The durable journal refused the append; the commit did not happen.
    #[error("journal error: {message}")]
    Journal { message: String },
}
