//! Ranking event union published to subscribers
//!
//! Events are ephemeral: they are fanned out to whoever is connected at
//! publish time and never persisted or replayed. A subscriber that needs
//! the full picture pulls a ranking snapshot first and merges events on
//! top of it.

use serde::{Deserialize, Serialize};

use crate::competitor::Competitor;

/// An event pushed over the ranking event stream.
///
/// Wire shape is internally tagged on `kind`:
/// `{"kind": "RankingUpdate", "competitor": {"id": "...", "rating": 1016}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RankingEvent {
    /// A competitor was created.
    PlayerCreated { competitor: Competitor },
    /// A competitor's rating changed.
    RankingUpdate { competitor: Competitor },
    /// Stream-level error signal.
    Error { message: String },
}

impl RankingEvent {
    /// The competitor carried by this event, if any.
    pub fn competitor(&self) -> Option<&Competitor> {
        match self {
            RankingEvent::PlayerCreated { competitor } => Some(competitor),
            RankingEvent::RankingUpdate { competitor } => Some(competitor),
            RankingEvent::Error { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_on_kind() {
        let event = RankingEvent::RankingUpdate {
            competitor: Competitor::new("bob", 984),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "RankingUpdate",
                "competitor": {"id": "bob", "rating": 984}
            })
        );
    }

    #[test]
    fn error_variant_carries_message_only() {
        let event = RankingEvent::Error {
            message: "stream closed".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "Error", "message": "stream closed"})
        );
    }
}
