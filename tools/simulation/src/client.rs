//! HTTP client for the ranking gateway
//!
//! Thin wrapper over reqwest: create competitors, report matches, pull
//! ranking snapshots, and consume the SSE event stream. All failures map
//! into the observer-side error taxonomy; nothing here retries.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

use types::competitor::Competitor;
use types::events::RankingEvent;
use types::matches::MatchReport;

/// Observer-side error taxonomy.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure reaching the server.
    #[error("server unreachable: {0}")]
    Unreachable(String),

    /// The server answered with a non-success status.
    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },

    /// Event-stream transport failure, terminal for that connection.
    #[error("event stream error: {0}")]
    Stream(String),
}

/// Seam between the scheduler and the transport, so scheduling logic can
/// be tested without a server.
#[async_trait]
pub trait MatchReporter: Send + Sync {
    async fn report(&self, winner: &str, loser: &str, draw: bool) -> Result<(), ClientError>;
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub async fn create_competitor(&self, id: &str) -> Result<Competitor, ClientError> {
        let response = self
            .http
            .post(format!("{}/competitor", self.base_url))
            .json(&serde_json::json!({ "id": id }))
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;
        Self::parse(response).await
    }

    pub async fn report_match(
        &self,
        winner: &str,
        loser: &str,
        draw: bool,
    ) -> Result<MatchReport, ClientError> {
        let response = self
            .http
            .post(format!("{}/match", self.base_url))
            .json(&serde_json::json!({ "winner": winner, "loser": loser, "draw": draw }))
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;
        Self::parse(response).await
    }

    pub async fn fetch_ranking(&self) -> Result<Vec<Competitor>, ClientError> {
        let response = self
            .http
            .get(format!("{}/ranking", self.base_url))
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;
        Self::parse(response).await
    }

    /// Open the persistent event stream.
    ///
    /// Returns once the stream is connected; events published from that
    /// point on are buffered by the connection, so the caller can fetch a
    /// ranking snapshot afterwards without losing anything in between.
    pub async fn subscribe_events(&self) -> Result<EventStream, ClientError> {
        let response = self
            .http
            .get(format!("{}/ranking/events", self.base_url))
            .send()
            .await
            .map_err(|e| ClientError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(EventStream::new(response))
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ClientError::Unreachable(e.to_string()))
        } else {
            Err(ClientError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            })
        }
    }
}

#[async_trait]
impl MatchReporter for ApiClient {
    async fn report(&self, winner: &str, loser: &str, draw: bool) -> Result<(), ClientError> {
        self.report_match(winner, loser, draw).await.map(|_| ())
    }
}

/// Incrementally decoded SSE stream of ranking events.
pub struct EventStream {
    response: reqwest::Response,
    buffer: String,
    pending: VecDeque<RankingEvent>,
}

impl EventStream {
    fn new(response: reqwest::Response) -> Self {
        Self {
            response,
            buffer: String::new(),
            pending: VecDeque::new(),
        }
    }

    /// Next event, or None once the server closes the stream.
    pub async fn next_event(&mut self) -> Result<Option<RankingEvent>, ClientError> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }

            match self.response.chunk().await {
                Ok(Some(chunk)) => {
                    self.buffer.push_str(&String::from_utf8_lossy(&chunk));
                    while let Some(newline) = self.buffer.find('\n') {
                        let line: String = self.buffer.drain(..=newline).collect();
                        if let Some(event) = parse_sse_data(line.trim_end()) {
                            self.pending.push_back(event);
                        }
                    }
                }
                Ok(None) => return Ok(None),
                Err(e) => return Err(ClientError::Stream(e.to_string())),
            }
        }
    }
}

/// Decode one SSE line. Only `data:` lines carry events; comments,
/// `event:` labels, and blank separators fall through.
fn parse_sse_data(line: &str) -> Option<RankingEvent> {
    let data = line.strip_prefix("data:")?.trim_start();
    match serde_json::from_str(data) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(error = %e, line = data, "undecodable event payload, skipping");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_lines_decode_to_events() {
        let event =
            parse_sse_data(r#"data: {"kind":"RankingUpdate","competitor":{"id":"a","rating":1016}}"#)
                .unwrap();
        assert_eq!(event.competitor().unwrap().rating, 1016);
    }

    #[test]
    fn non_data_lines_are_ignored() {
        assert!(parse_sse_data("event: message").is_none());
        assert!(parse_sse_data(": keep-alive").is_none());
        assert!(parse_sse_data("").is_none());
    }

    #[test]
    fn garbage_payloads_are_skipped() {
        assert!(parse_sse_data("data: {not json").is_none());
    }
}
