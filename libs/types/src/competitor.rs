//! Competitor entity
//!
//! The one mutable row of the system: an opaque id and the current Elo
//! rating. Ratings are mutated only by the rating store's match commit and
//! are never clamped: a long winning streak can push a competitor well
//! above the initial distribution span.

use serde::{Deserialize, Serialize};

use crate::ids::CompetitorId;

/// A ranked competitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    /// Opaque identifier, unique across the store.
    pub id: CompetitorId,
    /// Current Elo rating. Integer by design: the rating engine rounds on
    /// every update rather than carrying the exact real value.
    pub rating: i32,
}

impl Competitor {
    pub fn new(id: impl Into<CompetitorId>, rating: i32) -> Self {
        Self {
            id: id.into(),
            rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_plain_field_names() {
        let c = Competitor::new("alice", 1016);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json, serde_json::json!({"id": "alice", "rating": 1016}));
    }
}
