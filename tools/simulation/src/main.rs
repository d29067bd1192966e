mod client;
mod config;
mod ladder;
mod scheduler;

use std::sync::{Arc, PoisonError, RwLock};

use client::{ApiClient, ClientError};
use config::SimulationConfig;
use ladder::LadderView;
use scheduler::{AutoMatchScheduler, SchedulerConfig};
use tracing::{debug, info, warn};
use types::events::RankingEvent;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let config = SimulationConfig::from_env()?;
    info!(
        api_url = %config.api_url,
        competitors = config.competitors.len(),
        interval_ms = config.interval.as_millis() as u64,
        "simulator starting"
    );

    let client = Arc::new(ApiClient::new(config.api_url.clone()));

    for id in &config.competitors {
        match client.create_competitor(id).await {
            Ok(competitor) => {
                info!(id = %competitor.id, rating = competitor.rating, "competitor created")
            }
            Err(ClientError::Api { status: 409, .. }) => {
                debug!(%id, "competitor already exists")
            }
            Err(e) => warn!(%id, error = %e, "failed to create competitor"),
        }
    }

    // Sequencing point: subscribe first, then seed from a full fetch.
    // Events published while the fetch is in flight sit buffered in the
    // stream connection and get merged on top of the snapshot.
    let mut events = client.subscribe_events().await?;
    let ladder = Arc::new(RwLock::new(LadderView::new()));
    let snapshot = client.fetch_ranking().await?;
    info!(competitors = snapshot.len(), "ladder seeded");
    ladder
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .seed(snapshot);

    let ladder_for_stream = ladder.clone();
    let stream_task = tokio::spawn(async move {
        loop {
            match events.next_event().await {
                Ok(Some(event)) => match event {
                    RankingEvent::PlayerCreated { competitor }
                    | RankingEvent::RankingUpdate { competitor } => {
                        let mut view = ladder_for_stream
                            .write()
                            .unwrap_or_else(PoisonError::into_inner);
                        view.apply_update(competitor);
                        if let Some(leader) = view.snapshot().first() {
                            debug!(leader = %leader.id, rating = leader.rating, "ladder updated");
                        }
                    }
                    RankingEvent::Error { message } => {
                        warn!(%message, "server signaled a stream error")
                    }
                },
                Ok(None) => {
                    warn!("event stream closed by server");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "event stream failed");
                    break;
                }
            }
        }
    });

    let scheduler = AutoMatchScheduler::new(
        client,
        ladder,
        SchedulerConfig {
            interval: config.interval,
            draw_probability: config.draw_probability,
            seed: config.seed,
        },
    );
    scheduler.start();

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    scheduler.stop();
    stream_task.abort();

    Ok(())
}
