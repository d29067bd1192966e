//! Environment-driven simulator configuration
//!
//! `API_URL` (default http://localhost:8080), `COMPETITORS`
//! (comma-separated ids) or `COMPETITORS_COUNT` (generated bot ids),
//! `INTERVAL_MS`, `DRAW_PROBABILITY`, `SEED`.

use std::time::Duration;

use anyhow::Context;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_COMPETITORS_COUNT: usize = 4;
const DEFAULT_INTERVAL_MS: u64 = 2000;
const DEFAULT_DRAW_PROBABILITY: f64 = 0.1;
const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub api_url: String,
    pub competitors: Vec<String>,
    pub interval: Duration,
    pub draw_probability: f64,
    pub seed: u64,
}

impl SimulationConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_vars(
            std::env::var("API_URL").ok(),
            std::env::var("COMPETITORS").ok(),
            std::env::var("COMPETITORS_COUNT").ok(),
            std::env::var("INTERVAL_MS").ok(),
            std::env::var("DRAW_PROBABILITY").ok(),
            std::env::var("SEED").ok(),
        )
    }

    fn from_vars(
        api_url: Option<String>,
        competitors: Option<String>,
        count: Option<String>,
        interval_ms: Option<String>,
        draw_probability: Option<String>,
        seed: Option<String>,
    ) -> Result<Self, anyhow::Error> {
        let api_url = api_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let competitors = match competitors.as_deref() {
            Some(list) if !list.trim().is_empty() => list
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect(),
            _ => {
                let count = match count {
                    None => DEFAULT_COMPETITORS_COUNT,
                    Some(raw) => raw.parse().context("invalid COMPETITORS_COUNT")?,
                };
                (1..=count.max(1)).map(|i| format!("bot-{i}")).collect()
            }
        };

        let interval_ms = match interval_ms {
            None => DEFAULT_INTERVAL_MS,
            Some(raw) => raw.parse().context("invalid INTERVAL_MS")?,
        };

        let draw_probability = match draw_probability {
            None => DEFAULT_DRAW_PROBABILITY,
            Some(raw) => {
                let p: f64 = raw.parse().context("invalid DRAW_PROBABILITY")?;
                anyhow::ensure!((0.0..=1.0).contains(&p), "DRAW_PROBABILITY must be in [0, 1]");
                p
            }
        };

        let seed = match seed {
            None => DEFAULT_SEED,
            Some(raw) => raw.parse().context("invalid SEED")?,
        };

        Ok(Self {
            api_url,
            competitors,
            interval: Duration::from_millis(interval_ms),
            draw_probability,
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_generate_bot_ids() {
        let config = SimulationConfig::from_vars(None, None, None, None, None, None).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.competitors, vec!["bot-1", "bot-2", "bot-3", "bot-4"]);
        assert_eq!(config.interval, Duration::from_millis(2000));
    }

    #[test]
    fn explicit_list_overrides_count() {
        let config = SimulationConfig::from_vars(
            None,
            Some("alice, bob,,carol".to_string()),
            Some("9".to_string()),
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(config.competitors, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn out_of_range_draw_probability_is_rejected() {
        let result =
            SimulationConfig::from_vars(None, None, None, None, Some("1.5".to_string()), None);
        assert!(result.is_err());
    }
}
