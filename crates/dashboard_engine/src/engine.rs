use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use dashboard_logging::dashboard_error;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::fetch::{FetchSettings, OverviewFetcher, ReqwestFetcher};
use crate::poll::{ChannelEventSink, PollSettings, Poller};
use crate::{EngineEvent, FetchError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
    #[error("failed to start poller runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Owns the poller thread. Dropping the handle cancels polling.
pub struct EngineHandle {
    cancel: CancellationToken,
    refresh: Arc<Notify>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn start(fetch: FetchSettings, poll: PollSettings) -> Result<Self, EngineError> {
        let fetcher = Arc::new(ReqwestFetcher::new(fetch)?);
        Self::with_fetcher(fetcher, poll)
    }

    pub fn with_fetcher(
        fetcher: Arc<dyn OverviewFetcher>,
        poll: PollSettings,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (event_tx, event_rx) = mpsc::channel();
        let poller = Poller::new(fetcher, poll);
        let refresh = poller.refresh_handle();
        let cancel = CancellationToken::new();

        let worker_cancel = cancel.clone();
        let worker = thread::Builder::new()
            .name("overview-poller".to_string())
            .spawn(move || {
                let sink = ChannelEventSink::new(event_tx);
                runtime.block_on(poller.run(&sink, worker_cancel));
            })?;

        Ok(Self {
            cancel,
            refresh,
            event_rx: Mutex::new(event_rx),
            worker: Some(worker),
        })
    }

    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        let rx = self.event_rx.lock().ok()?;
        rx.recv_timeout(timeout).ok()
    }

    /// Stop polling and wait for the poller thread to exit.
    pub fn shutdown(mut self) {
        self.stop();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                dashboard_error!("poller thread panicked");
            }
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
