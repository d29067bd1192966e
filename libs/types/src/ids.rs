//! Unique identifier types for ranker entities
//!
//! Competitor ids are caller-provided opaque strings: they arrive over the
//! HTTP surface and are never minted by the server. Subscriber ids are
//! server-assigned UUID v7 values, time-sortable for log correlation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for a competitor.
///
/// Unique across the store, immutable once created. Emptiness is a
/// validation concern for the request layer; the newtype itself accepts
/// any string so that journal replay round-trips exactly what was stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitorId(String);

impl CompetitorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CompetitorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CompetitorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unique identifier for an event-stream subscriber
///
/// Uses UUID v7 for time-based sorting, so subscriber churn can be read
/// chronologically out of the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    /// Create a new SubscriberId with current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
