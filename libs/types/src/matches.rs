//! Match log records
//!
//! One record per committed match, appended to the journal in sequence
//! order. Records are immutable once written.

use serde::{Deserialize, Serialize};

use crate::competitor::Competitor;
use crate::ids::CompetitorId;

/// A single committed match.
///
/// When `draw` is true, `winner`/`loser` degrade to "first/second
/// participant": the reported order is retained but the outcome is
/// symmetric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Monotonic sequence number, assigned at commit time (starts at 1).
    pub sequence: u64,
    /// First participant; the winner unless `draw`.
    pub winner: CompetitorId,
    /// Second participant; the loser unless `draw`.
    pub loser: CompetitorId,
    /// Whether the match was a draw.
    pub draw: bool,
    /// Commit timestamp, unix milliseconds.
    pub occurred_at: i64,
}

/// The two updated competitors produced by one committed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub winner: Competitor,
    pub loser: Competitor,
}
