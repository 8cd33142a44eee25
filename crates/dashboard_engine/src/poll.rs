use std::fmt;
use std::sync::{mpsc, Arc};
use std::time::Duration;

use dashboard_core::JobCollection;
use dashboard_logging::{dashboard_debug, dashboard_info, dashboard_warn};
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::fetch::OverviewFetcher;
use crate::{EngineEvent, PollOutcome};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/overview";
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(15_000);

/// Produces the completion timestamp attached to each poll.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct PollSettings {
    pub endpoint: String,
    pub interval: Duration,
    pub clock: Clock,
}

impl fmt::Debug for PollSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollSettings")
            .field("endpoint", &self.endpoint)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Periodic overview poller.
///
/// Polls once immediately, then once per interval. A refresh request polls
/// right away and restarts the interval. Only one request is ever in flight.
pub struct Poller {
    fetcher: Arc<dyn OverviewFetcher>,
    settings: PollSettings,
    refresh: Arc<Notify>,
}

impl Poller {
    pub fn new(fetcher: Arc<dyn OverviewFetcher>, settings: PollSettings) -> Self {
        Self {
            fetcher,
            settings,
            refresh: Arc::new(Notify::new()),
        }
    }

    /// Handle used to request an immediate poll from another task or thread.
    pub fn refresh_handle(&self) -> Arc<Notify> {
        self.refresh.clone()
    }

    /// Fetch and parse the overview once.
    pub async fn poll_once(&self, cycle: u64) -> EngineEvent {
        let outcome = match self.fetcher.fetch_overview(&self.settings.endpoint).await {
            Ok(body) => match JobCollection::from_json(&body) {
                Ok(collection) => {
                    dashboard_info!("poll #{} loaded {} records", cycle, collection.len());
                    PollOutcome::Loaded(collection)
                }
                Err(err) => {
                    dashboard_warn!("poll #{} returned an unreadable body: {}", cycle, err);
                    PollOutcome::ParseFailed(err)
                }
            },
            Err(err) => {
                dashboard_warn!(
                    "poll #{} failed for {}: {}",
                    cycle,
                    self.settings.endpoint,
                    err
                );
                PollOutcome::FetchFailed(err)
            }
        };

        EngineEvent::Polled {
            cycle,
            completed_at: (self.settings.clock)(),
            outcome,
        }
    }

    /// Run until `cancel` fires. An in-flight request is dropped on cancel.
    pub async fn run(&self, sink: &dyn EventSink, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.settings.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycle: u64 = 0;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = self.refresh.notified() => {
                    dashboard_debug!("manual refresh requested");
                    interval.reset();
                }
                _ = interval.tick() => {}
            }

            cycle += 1;
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                event = self.poll_once(cycle) => event,
            };
            sink.emit(event);
        }

        dashboard_info!("poller stopped after {} cycles", cycle);
    }
}
