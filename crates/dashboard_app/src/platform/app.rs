use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};
use dashboard_core::{update, DashboardState, LoadStatus, Msg};
use dashboard_engine::PagePublisher;
use dashboard_logging::{dashboard_error, dashboard_info};

use super::config::DashboardConfig;
use super::effects::EffectRunner;
use super::logging;
use super::page::PageRenderer;

const TICK: Duration = Duration::from_millis(250);

pub fn run_app(config: DashboardConfig) -> anyhow::Result<()> {
    logging::initialize(config.log_destination, config.log_level, &config.output_dir);
    dashboard_info!(
        "polling {} every {} ms, writing to {:?}",
        config.endpoint,
        config.interval.as_millis(),
        config.output_dir
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner =
        EffectRunner::start(&config, msg_tx.clone()).context("failed to start the poller")?;
    if !config.once {
        spawn_operator_input(msg_tx.clone());
    }

    let mut page = PageRenderer::new(PagePublisher::new(config.output_dir.clone()));
    let mut state = DashboardState::new();
    let mut publish_failed = false;

    loop {
        let msg = match msg_rx.recv_timeout(TICK) {
            Ok(msg) => msg,
            Err(RecvTimeoutError::Timeout) => Msg::Tick,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        let poll_finished = matches!(
            msg,
            Msg::OverviewLoaded { .. } | Msg::OverviewFailed { .. }
        );

        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);

        if state.consume_dirty() {
            match page.render(&state.view()) {
                Ok(path) => {
                    publish_failed = false;
                    dashboard_info!("page updated at {:?}", path);
                }
                Err(err) => {
                    publish_failed = true;
                    dashboard_error!("failed to write page: {}", err);
                }
            }
        }

        if config.once && poll_finished {
            let _ = msg_tx.send(Msg::ShutdownRequested);
        }
        if state.is_stopped() {
            break;
        }
    }

    runner.shutdown();
    dashboard_info!("dashboard stopped after {} polls", state.last_cycle());

    if config.once {
        if publish_failed {
            bail!("could not write the dashboard page");
        }
        if state.status() == LoadStatus::Failed {
            bail!("overview unavailable from {}", config.endpoint);
        }
    }
    Ok(())
}

/// `r` + Enter polls now, `q` + Enter quits. EOF leaves the dashboard running.
fn spawn_operator_input(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let msg = match line.trim() {
                "r" | "refresh" => Msg::RefreshRequested,
                "q" | "quit" => Msg::ShutdownRequested,
                _ => continue,
            };
            if msg_tx.send(msg).is_err() {
                break;
            }
        }
    });
}
