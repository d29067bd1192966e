//! Elo rating math
//!
//! Pure functions, no side effects, no failure modes. The caller feeds in
//! current ratings and an outcome; nothing here touches the store.
//!
//! Ratings are rounded to the nearest integer on every update rather than
//! carried as exact reals. Repeated small updates can therefore drift from
//! the mathematically exact value; the per-update rounding is kept
//! deliberately for bit-for-bit compatibility with the original ranker.

/// Sensitivity constant: how far a single result moves a rating.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Outcome of a match from one side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Loss,
    Draw,
    Win,
}

impl MatchOutcome {
    /// Actual score used by the update formula.
    pub fn score(self) -> f64 {
        match self {
            MatchOutcome::Loss => 0.0,
            MatchOutcome::Draw => 0.5,
            MatchOutcome::Win => 1.0,
        }
    }
}

/// Predicted win probability for side A against side B.
///
/// `1 / (1 + 10^((b - a) / 400))`, always in (0, 1). Symmetric complement:
/// `expected_score(a, b) + expected_score(b, a) == 1` up to float tolerance.
pub fn expected_score(rating_a: i32, rating_b: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf(f64::from(rating_b - rating_a) / 400.0))
}

/// Next rating after one match: `round(old + k * (score - expected))`.
pub fn next_rating(old: i32, opponent: i32, outcome: MatchOutcome, k: f64) -> i32 {
    let expected = expected_score(old, opponent);
    (f64::from(old) + k * (outcome.score() - expected)).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn equal_ratings_expect_half() {
        for r in [0, 800, 1000, 1500, 2400] {
            assert_eq!(expected_score(r, r), 0.5);
        }
    }

    #[test]
    fn draw_between_equals_is_a_zero_delta() {
        assert_eq!(next_rating(1000, 1000, MatchOutcome::Draw, DEFAULT_K_FACTOR), 1000);
    }

    #[test]
    fn decisive_between_equals_moves_sixteen() {
        assert_eq!(next_rating(1000, 1000, MatchOutcome::Win, DEFAULT_K_FACTOR), 1016);
        assert_eq!(next_rating(1000, 1000, MatchOutcome::Loss, DEFAULT_K_FACTOR), 984);
    }

    #[test]
    fn underdog_gains_more_than_favorite() {
        let underdog = next_rating(1000, 1400, MatchOutcome::Win, DEFAULT_K_FACTOR) - 1000;
        let favorite = next_rating(1400, 1000, MatchOutcome::Win, DEFAULT_K_FACTOR) - 1400;
        assert!(underdog > favorite);
    }

    proptest! {
        #[test]
        fn complement_sums_to_one(a in -5000i32..5000, b in -5000i32..5000) {
            let sum = expected_score(a, b) + expected_score(b, a);
            prop_assert!((sum - 1.0).abs() < 1e-9);
        }

        #[test]
        fn expected_score_stays_in_open_unit_interval(a in -5000i32..5000, b in -5000i32..5000) {
            let e = expected_score(a, b);
            prop_assert!(e > 0.0 && e < 1.0);
        }
    }
}
