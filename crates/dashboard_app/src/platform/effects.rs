use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use dashboard_core::{Effect, Msg};
use dashboard_engine::{EngineError, EngineHandle, PollSettings};
use dashboard_logging::{dashboard_info, dashboard_warn};

use super::config::DashboardConfig;

const EVENT_WAIT: Duration = Duration::from_millis(100);

pub struct EffectRunner {
    engine: Arc<EngineHandle>,
    forwarder: Option<thread::JoinHandle<()>>,
}

impl EffectRunner {
    pub fn start(config: &DashboardConfig, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let poll = PollSettings {
            endpoint: config.endpoint.to_string(),
            interval: config.interval,
            clock: Arc::new(|| Utc::now().to_rfc3339()),
        };
        let engine = Arc::new(EngineHandle::start(config.fetch.clone(), poll)?);
        let forwarder = spawn_event_loop(engine.clone(), msg_tx);
        Ok(Self {
            engine,
            forwarder: Some(forwarder),
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RefreshNow => {
                    dashboard_info!("manual refresh");
                    self.engine.refresh_now();
                }
                Effect::StopPolling => {
                    dashboard_info!("stopping poller");
                    self.engine.stop();
                }
            }
        }
    }

    /// Stop polling and wait for the engine threads to finish.
    pub fn shutdown(mut self) {
        self.engine.stop();
        if let Some(forwarder) = self.forwarder.take() {
            if forwarder.join().is_err() {
                dashboard_warn!("event forwarder panicked");
            }
        }
        if let Ok(engine) = Arc::try_unwrap(self.engine) {
            engine.shutdown();
        }
    }
}

fn spawn_event_loop(engine: Arc<EngineHandle>, msg_tx: mpsc::Sender<Msg>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        match engine.recv_timeout(EVENT_WAIT) {
            Some(event) => {
                if msg_tx.send(Msg::from(event)).is_err() {
                    break;
                }
            }
            None => {
                if engine.is_stopped() {
                    break;
                }
            }
        }
    })
}
