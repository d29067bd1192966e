//! Periodic auto-match scheduler
//!
//! While running, each tick picks two distinct competitors uniformly at
//! random from the current ladder snapshot, rolls an outcome, and reports
//! it. Skips the tick when fewer than two competitors are known. A failed
//! report is logged and the schedule keeps going.
//!
//! Explicit two-state lifecycle: Idle or Running with exactly one timer
//! task. `start`/`stop` are guarded transitions and idempotent.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use types::competitor::Competitor;

use crate::client::MatchReporter;
use crate::ladder::LadderView;

/// Configuration for the auto-match scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Delay between ticks.
    pub interval: Duration,
    /// Probability that a manufactured match is a draw.
    pub draw_probability: f64,
    /// RNG seed, so a run's match sequence is reproducible.
    pub seed: u64,
}

enum SchedulerState {
    Idle,
    Running { task: JoinHandle<()> },
}

pub struct AutoMatchScheduler<R: MatchReporter + 'static> {
    reporter: Arc<R>,
    ladder: Arc<RwLock<LadderView>>,
    config: SchedulerConfig,
    state: Mutex<SchedulerState>,
}

impl<R: MatchReporter + 'static> AutoMatchScheduler<R> {
    pub fn new(reporter: Arc<R>, ladder: Arc<RwLock<LadderView>>, config: SchedulerConfig) -> Self {
        Self {
            reporter,
            ladder,
            config,
            state: Mutex::new(SchedulerState::Idle),
        }
    }

    /// Begin ticking. Returns false if already running (no second timer
    /// is ever spawned).
    pub fn start(&self) -> bool {
        let mut state = self.lock_state();
        if matches!(*state, SchedulerState::Running { .. }) {
            debug!("scheduler already running");
            return false;
        }

        let reporter = self.reporter.clone();
        let ladder = self.ladder.clone();
        let config = self.config.clone();
        let task = tokio::spawn(async move {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
            let mut ticker = tokio::time::interval(config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let snapshot = ladder
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .snapshot();
                run_tick(reporter.as_ref(), &snapshot, &config, &mut rng).await;
            }
        });

        *state = SchedulerState::Running { task };
        info!(interval_ms = self.config.interval.as_millis() as u64, "scheduler started");
        true
    }

    /// Stop ticking. Returns false if not running.
    pub fn stop(&self) -> bool {
        let mut state = self.lock_state();
        match std::mem::replace(&mut *state, SchedulerState::Idle) {
            SchedulerState::Running { task } => {
                task.abort();
                info!("scheduler stopped");
                true
            }
            SchedulerState::Idle => false,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.lock_state(), SchedulerState::Running { .. })
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: MatchReporter + 'static> Drop for AutoMatchScheduler<R> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_tick<R: MatchReporter>(
    reporter: &R,
    snapshot: &[Competitor],
    config: &SchedulerConfig,
    rng: &mut ChaCha8Rng,
) {
    let Some((first, second)) = pick_pair(snapshot, rng) else {
        debug!(known = snapshot.len(), "fewer than two competitors, skipping tick");
        return;
    };

    let draw = rng.gen_bool(config.draw_probability);
    let (winner, loser) = if draw || rng.gen_bool(0.5) {
        (first, second)
    } else {
        (second, first)
    };

    if let Err(e) = reporter
        .report(winner.id.as_str(), loser.id.as_str(), draw)
        .await
    {
        warn!(winner = %winner.id, loser = %loser.id, error = %e, "match report failed, keeping schedule");
    }
}

/// Two distinct competitors chosen uniformly at random; None when fewer
/// than two are known.
fn pick_pair<'a>(
    snapshot: &'a [Competitor],
    rng: &mut impl Rng,
) -> Option<(&'a Competitor, &'a Competitor)> {
    if snapshot.len() < 2 {
        return None;
    }
    let first = rng.gen_range(0..snapshot.len());
    let mut second = rng.gen_range(0..snapshot.len() - 1);
    if second >= first {
        second += 1;
    }
    Some((&snapshot[first], &snapshot[second]))
}
