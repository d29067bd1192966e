//! Environment-driven gateway configuration

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use ranking_engine::broker::DEFAULT_QUEUE_CAPACITY;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_JOURNAL_PATH: &str = "ranker.journal";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listen address (`BIND_ADDR`).
    pub bind_addr: SocketAddr,
    /// Journal file (`JOURNAL_PATH`); an empty value runs the store
    /// in-memory with no durability.
    pub journal_path: Option<PathBuf>,
    /// Per-subscriber event queue capacity (`EVENT_QUEUE_CAPACITY`).
    pub event_queue_capacity: usize,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_vars(
            std::env::var("BIND_ADDR").ok(),
            std::env::var("JOURNAL_PATH").ok(),
            std::env::var("EVENT_QUEUE_CAPACITY").ok(),
        )
    }

    fn from_vars(
        bind_addr: Option<String>,
        journal_path: Option<String>,
        queue_capacity: Option<String>,
    ) -> Result<Self, anyhow::Error> {
        let bind_addr = bind_addr
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("invalid BIND_ADDR")?;

        let journal_path = match journal_path.as_deref() {
            None => Some(PathBuf::from(DEFAULT_JOURNAL_PATH)),
            Some("") => None,
            Some(path) => Some(PathBuf::from(path)),
        };

        let event_queue_capacity = match queue_capacity {
            None => DEFAULT_QUEUE_CAPACITY,
            Some(raw) => raw.parse().context("invalid EVENT_QUEUE_CAPACITY")?,
        };

        Ok(Self {
            bind_addr,
            journal_path,
            event_queue_capacity,
        })
    }
}
