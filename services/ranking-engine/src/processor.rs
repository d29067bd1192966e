//! Match processor
//!
//! Orchestrates one reported match: validate, commit through the store,
//! then publish both rating updates. Events go out only after the commit
//! is durable, and always as a pair, never one without the other.

use std::sync::Arc;

use tracing::info;

use types::errors::RankingError;
use types::events::RankingEvent;
use types::ids::CompetitorId;
use types::matches::MatchReport;

use crate::broker::SubscriptionBroker;
use crate::store::RatingStore;

pub struct MatchProcessor {
    store: Arc<RatingStore>,
    broker: Arc<SubscriptionBroker>,
}

impl MatchProcessor {
    pub fn new(store: Arc<RatingStore>, broker: Arc<SubscriptionBroker>) -> Self {
        Self { store, broker }
    }

    /// Process one reported match outcome.
    ///
    /// Validation order: malformed input first (`InvalidRequest`), then
    /// existence (`UnknownCompetitor`, no mutation performed). On success
    /// the two `RankingUpdate` events are published winner-then-loser.
    pub fn report_match(
        &self,
        winner: &CompetitorId,
        loser: &CompetitorId,
        draw: bool,
    ) -> Result<MatchReport, RankingError> {
        if winner.is_empty() || loser.is_empty() {
            return Err(RankingError::InvalidRequest(
                "winner and loser are required".to_string(),
            ));
        }
        if winner == loser {
            return Err(RankingError::InvalidRequest(
                "winner and loser must be distinct".to_string(),
            ));
        }

        let committed = self.store.commit_match(winner, loser, draw)?;

        info!(
            sequence = committed.record.sequence,
            %winner,
            %loser,
            draw,
            winner_rating = committed.winner.rating,
            loser_rating = committed.loser.rating,
            "match processed"
        );

        self.broker.publish(&RankingEvent::RankingUpdate {
            competitor: committed.winner.clone(),
        });
        self.broker.publish(&RankingEvent::RankingUpdate {
            competitor: committed.loser.clone(),
        });

        Ok(MatchReport {
            winner: committed.winner,
            loser: committed.loser,
        })
    }
}
