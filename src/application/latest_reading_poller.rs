// Latest reading poller - Periodic refresh of the latest reading card
use crate::application::dashboard_service::build_card;
use crate::application::reading_repository::ReadingRepository;
use crate::domain::air_quality::AirQualityScale;
use crate::domain::dashboard::LatestUpdate;
use crate::domain::session::Session;
use crate::domain::transmitter::Transmitter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

const FAILED_TO_LOAD: &str = "Failed to load latest reading";

/// Running poll. Dropping the handle stops the task.
pub struct PollHandle {
    rx: mpsc::Receiver<LatestUpdate>,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub async fn recv(&mut self) -> Option<LatestUpdate> {
        self.rx.recv().await
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[derive(Clone)]
pub struct LatestReadingPoller {
    repository: Arc<dyn ReadingRepository>,
    scale: AirQualityScale,
    interval: Duration,
}

impl LatestReadingPoller {
    pub fn new(
        repository: Arc<dyn ReadingRepository>,
        scale: AirQualityScale,
        interval: Duration,
    ) -> Self {
        Self {
            repository,
            scale,
            interval,
        }
    }

    /// Poll immediately, then once per interval.
    ///
    /// Fetches never overlap: the next one starts only after the previous
    /// one resolved or timed out, so updates arrive in `sequence` order.
    pub fn spawn(&self, session: Session, transmitter: Transmitter) -> PollHandle {
        let (tx, rx) = mpsc::channel(4);
        let repository = self.repository.clone();
        let scale = self.scale.clone();
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut sequence = 0u64;

            loop {
                ticker.tick().await;
                sequence += 1;

                let fetched =
                    tokio::time::timeout(period, repository.fetch_latest(&session, &transmitter))
                        .await;

                let update = match fetched {
                    Ok(Ok(reading)) => LatestUpdate {
                        sequence,
                        transmitter_id: transmitter.id,
                        latest: reading.map(|r| build_card(&r, &scale)),
                        error: None,
                    },
                    Ok(Err(e)) => {
                        tracing::error!("Error polling latest reading for {}: {:#}", transmitter.name, e);
                        failed(sequence, &transmitter)
                    }
                    Err(_) => {
                        tracing::warn!(
                            "Latest reading poll for {} timed out after {:?}",
                            transmitter.name,
                            period
                        );
                        failed(sequence, &transmitter)
                    }
                };

                if tx.send(update).await.is_err() {
                    tracing::debug!("Poll receiver for {} closed", transmitter.name);
                    break;
                }
            }
        });

        PollHandle { rx, task }
    }
}

fn failed(sequence: u64, transmitter: &Transmitter) -> LatestUpdate {
    LatestUpdate {
        sequence,
        transmitter_id: transmitter.id,
        latest: None,
        error: Some(FAILED_TO_LOAD.to_string()),
    }
}
