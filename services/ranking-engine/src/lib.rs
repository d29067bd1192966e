//! Ranking Engine Service
//!
//! The server-side core of the realtime Elo ranker: rating math, durable
//! store, match orchestration, and event fanout.
//!
//! **Key Invariants:**
//! - Competitor ids are unique across the store
//! - A committed match mutates both ratings and appends one record as a
//!   single atomic unit
//! - Rating reads inside a commit observe pre-match values for both sides
//! - Events reach every live subscriber in publish-call order (per
//!   subscriber); a lagging subscriber is dropped, never waited on
//!
//! # Architecture
//!
//! ```text
//! report_match
//!      │
//! ┌────▼────────┐
//! │MatchProcessor│  ← validates, orchestrates
//! └────┬────────┘
//!      │
//! ┌────▼───────┐   ┌─────────┐
//! │RatingStore │──▶│ Journal │  ← atomic commit, WAL append
//! └────┬───────┘   └─────────┘
//!      │
//! ┌────▼──────────────┐
//! │SubscriptionBroker │  ← fanout to live subscribers
//! └───────────────────┘
//! ```

pub mod broker;
pub mod elo;
pub mod journal;
pub mod processor;
pub mod store;

pub use broker::{Subscription, SubscriptionBroker};
pub use processor::MatchProcessor;
pub use store::{CommittedMatch, RatingStore};
