//! Rating store
//!
//! Owns the competitor table and the append-only match log. All mutation
//! goes through one mutex: a match commit is a read-compute-journal-write
//! critical section, so two commits sharing a competitor can never lose an
//! update to interleaving.
//!
//! Field validation (empty ids, self-matches) lives in the request layer;
//! the store enforces existence and uniqueness only.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use types::competitor::Competitor;
use types::errors::RankingError;
use types::ids::CompetitorId;
use types::matches::MatchRecord;

use crate::elo::{self, MatchOutcome, DEFAULT_K_FACTOR};
use crate::journal::{JournalError, JournalRecord, MatchJournal};

/// Fallback initial rating for an empty store.
pub const DEFAULT_INITIAL_RATING: i32 = 1000;

/// Result of one committed match: both updated competitors plus the log
/// record, produced as a single atomic unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedMatch {
    pub winner: Competitor,
    pub loser: Competitor,
    pub record: MatchRecord,
}

struct StoreInner {
    /// BTreeMap for deterministic iteration: ranking ties resolve by id.
    competitors: BTreeMap<CompetitorId, i32>,
    /// In-memory tail of the match log.
    log: Vec<MatchRecord>,
    /// Sequence assigned to the next committed match.
    next_sequence: u64,
    /// Durable journal; None for ephemeral stores.
    journal: Option<MatchJournal>,
}

/// Durable mapping from competitor id to current rating, plus the match log.
pub struct RatingStore {
    inner: Mutex<StoreInner>,
}

impl RatingStore {
    /// Ephemeral store with no journal. Used by tests and by runs that
    /// opt out of durability.
    pub fn in_memory() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                competitors: BTreeMap::new(),
                log: Vec::new(),
                next_sequence: 1,
                journal: None,
            }),
        }
    }

    /// Open a journal-backed store, rebuilding state by replay.
    ///
    /// Creations insert rows; matches re-apply the Elo update, which is
    /// deterministic, so the rebuilt table matches the one that produced
    /// the journal.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, JournalError> {
        let path = path.as_ref();
        let records = MatchJournal::read_all(path)?;

        let mut competitors: BTreeMap<CompetitorId, i32> = BTreeMap::new();
        let mut log: Vec<MatchRecord> = Vec::new();

        for record in records {
            match record {
                JournalRecord::CompetitorCreated { id, rating } => {
                    if competitors.insert(id.clone(), rating).is_some() {
                        warn!(%id, "duplicate creation in journal, keeping later rating");
                    }
                }
                JournalRecord::MatchPlayed(record) => {
                    let (Some(&w), Some(&l)) = (
                        competitors.get(&record.winner),
                        competitors.get(&record.loser),
                    ) else {
                        warn!(sequence = record.sequence, "journaled match references unknown competitor, skipping");
                        continue;
                    };
                    let (w_next, l_next) = next_ratings(w, l, record.draw);
                    competitors.insert(record.winner.clone(), w_next);
                    competitors.insert(record.loser.clone(), l_next);
                    log.push(record);
                }
            }
        }

        let next_sequence = log.last().map(|r| r.sequence + 1).unwrap_or(1);
        debug!(
            path = %path.display(),
            competitors = competitors.len(),
            matches = log.len(),
            "rating store restored from journal"
        );

        Ok(Self {
            inner: Mutex::new(StoreInner {
                competitors,
                log,
                next_sequence,
                journal: Some(MatchJournal::open(path)?),
            }),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state of one competitor.
    pub fn get(&self, id: &CompetitorId) -> Option<Competitor> {
        let inner = self.lock();
        inner
            .competitors
            .get(id)
            .map(|&rating| Competitor::new(id.clone(), rating))
    }

    /// Create a competitor with the given initial rating.
    pub fn create(&self, id: CompetitorId, rating: i32) -> Result<Competitor, RankingError> {
        let mut inner = self.lock();
        if inner.competitors.contains_key(&id) {
            return Err(RankingError::AlreadyExists { id });
        }

        if let Some(journal) = inner.journal.as_mut() {
            journal
                .append(&JournalRecord::CompetitorCreated {
                    id: id.clone(),
                    rating,
                })
                .map_err(|e| RankingError::Journal {
                    message: e.to_string(),
                })?;
        }

        inner.competitors.insert(id.clone(), rating);
        debug!(%id, rating, "competitor created");
        Ok(Competitor::new(id, rating))
    }

    /// Rounded mean of all current ratings, or the fixed fallback when the
    /// store is empty.
    pub fn default_initial_rating(&self) -> i32 {
        let inner = self.lock();
        if inner.competitors.is_empty() {
            return DEFAULT_INITIAL_RATING;
        }
        let sum: i64 = inner.competitors.values().map(|&r| i64::from(r)).sum();
        (sum as f64 / inner.competitors.len() as f64).round() as i32
    }

    /// Full ladder, descending by rating. Ties resolve by id, which keeps
    /// the order deterministic across calls.
    pub fn ranking(&self) -> Vec<Competitor> {
        let inner = self.lock();
        let mut out: Vec<Competitor> = inner
            .competitors
            .iter()
            .map(|(id, &rating)| Competitor::new(id.clone(), rating))
            .collect();
        out.sort_by(|a, b| b.rating.cmp(&a.rating));
        out
    }

    /// Commit one match: read both pre-match ratings, compute both next
    /// ratings, journal the record, then apply all three mutations.
    ///
    /// Either everything lands or nothing does: a failed journal append
    /// leaves ratings and log untouched.
    pub fn commit_match(
        &self,
        winner: &CompetitorId,
        loser: &CompetitorId,
        draw: bool,
    ) -> Result<CommittedMatch, RankingError> {
        let mut inner = self.lock();

        let w_rating = *inner
            .competitors
            .get(winner)
            .ok_or_else(|| RankingError::UnknownCompetitor { id: winner.clone() })?;
        let l_rating = *inner
            .competitors
            .get(loser)
            .ok_or_else(|| RankingError::UnknownCompetitor { id: loser.clone() })?;

        // Both sides computed from pre-match values.
        let (w_next, l_next) = next_ratings(w_rating, l_rating, draw);

        let record = MatchRecord {
            sequence: inner.next_sequence,
            winner: winner.clone(),
            loser: loser.clone(),
            draw,
            occurred_at: now_millis(),
        };

        if let Some(journal) = inner.journal.as_mut() {
            journal
                .append(&JournalRecord::MatchPlayed(record.clone()))
                .map_err(|e| RankingError::Journal {
                    message: e.to_string(),
                })?;
        }

        inner.next_sequence += 1;
        inner.competitors.insert(winner.clone(), w_next);
        inner.competitors.insert(loser.clone(), l_next);
        inner.log.push(record.clone());

        debug!(
            sequence = record.sequence,
            %winner,
            %loser,
            draw,
            winner_rating = w_next,
            loser_rating = l_next,
            "match committed"
        );

        Ok(CommittedMatch {
            winner: Competitor::new(winner.clone(), w_next),
            loser: Competitor::new(loser.clone(), l_next),
            record,
        })
    }

    /// Number of competitors in the store.
    pub fn competitor_count(&self) -> usize {
        self.lock().competitors.len()
    }

    /// Number of committed matches.
    pub fn match_count(&self) -> usize {
        self.lock().log.len()
    }
}

fn next_ratings(winner: i32, loser: i32, draw: bool) -> (i32, i32) {
    let (w_out, l_out) = if draw {
        (MatchOutcome::Draw, MatchOutcome::Draw)
    } else {
        (MatchOutcome::Win, MatchOutcome::Loss)
    };
    (
        elo::next_rating(winner, loser, w_out, DEFAULT_K_FACTOR),
        elo::next_rating(loser, winner, l_out, DEFAULT_K_FACTOR),
    )
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CompetitorId {
        CompetitorId::new(s)
    }

    #[test]
    fn duplicate_create_is_rejected_and_rating_kept() {
        let store = RatingStore::in_memory();
        store.create(id("alice"), 1200).unwrap();

        let err = store.create(id("alice"), 900).unwrap_err();
        assert_eq!(err, RankingError::AlreadyExists { id: id("alice") });
        assert_eq!(store.get(&id("alice")).unwrap().rating, 1200);
    }

    #[test]
    fn default_initial_rating_is_fallback_when_empty() {
        let store = RatingStore::in_memory();
        assert_eq!(store.default_initial_rating(), DEFAULT_INITIAL_RATING);
    }

    #[test]
    fn default_initial_rating_is_rounded_mean() {
        let store = RatingStore::in_memory();
        store.create(id("a"), 1000).unwrap();
        store.create(id("b"), 1001).unwrap();
        // mean 1000.5 rounds up
        assert_eq!(store.default_initial_rating(), 1001);
    }

    #[test]
    fn unknown_competitor_commit_mutates_nothing() {
        let store = RatingStore::in_memory();
        store.create(id("alice"), 1000).unwrap();

        let err = store.commit_match(&id("alice"), &id("ghost"), false).unwrap_err();
        assert_eq!(err, RankingError::UnknownCompetitor { id: id("ghost") });
        assert_eq!(store.get(&id("alice")).unwrap().rating, 1000);
        assert_eq!(store.match_count(), 0);
    }

    #[test]
    fn decisive_match_between_equals_moves_sixteen() {
        let store = RatingStore::in_memory();
        store.create(id("alice"), 1000).unwrap();
        store.create(id("bob"), 1000).unwrap();

        let committed = store.commit_match(&id("alice"), &id("bob"), false).unwrap();
        assert_eq!(committed.winner.rating, 1016);
        assert_eq!(committed.loser.rating, 984);
        assert_eq!(committed.record.sequence, 1);
        assert_eq!(store.match_count(), 1);
    }

    #[test]
    fn draw_between_equals_leaves_ratings_but_appends_record() {
        let store = RatingStore::in_memory();
        store.create(id("alice"), 1000).unwrap();
        store.create(id("bob"), 1000).unwrap();

        let committed = store.commit_match(&id("alice"), &id("bob"), true).unwrap();
        assert_eq!(committed.winner.rating, 1000);
        assert_eq!(committed.loser.rating, 1000);
        assert_eq!(store.match_count(), 1);
    }

    #[test]
    fn sequences_are_monotonic() {
        let store = RatingStore::in_memory();
        store.create(id("a"), 1000).unwrap();
        store.create(id("b"), 1000).unwrap();

        let first = store.commit_match(&id("a"), &id("b"), false).unwrap();
        let second = store.commit_match(&id("b"), &id("a"), false).unwrap();
        assert_eq!(first.record.sequence, 1);
        assert_eq!(second.record.sequence, 2);
    }

    #[test]
    fn ranking_is_descending_with_ties_by_id() {
        let store = RatingStore::in_memory();
        store.create(id("carol"), 1100).unwrap();
        store.create(id("bob"), 1000).unwrap();
        store.create(id("alice"), 1000).unwrap();

        let ids: Vec<String> = store
            .ranking()
            .into_iter()
            .map(|c| c.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["carol", "alice", "bob"]);
    }

    #[test]
    fn journal_backed_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranker.journal");

        {
            let store = RatingStore::open(&path).unwrap();
            store.create(id("alice"), 1000).unwrap();
            store.create(id("bob"), 1000).unwrap();
            store.commit_match(&id("alice"), &id("bob"), false).unwrap();
        }

        let store = RatingStore::open(&path).unwrap();
        assert_eq!(store.get(&id("alice")).unwrap().rating, 1016);
        assert_eq!(store.get(&id("bob")).unwrap().rating, 984);
        assert_eq!(store.match_count(), 1);

        // Sequences continue where the journal left off.
        let committed = store.commit_match(&id("bob"), &id("alice"), false).unwrap();
        assert_eq!(committed.record.sequence, 2);
    }
}
