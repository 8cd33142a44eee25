use crate::{DashboardState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: DashboardState, msg: Msg) -> (DashboardState, Vec<Effect>) {
    let effects = match msg {
        Msg::OverviewLoaded {
            cycle,
            completed_at,
            collection,
        } => {
            if state.accepts_cycle(cycle) {
                state.apply_loaded(cycle, completed_at, collection);
            }
            Vec::new()
        }
        Msg::OverviewFailed {
            cycle,
            completed_at,
            error,
        } => {
            if state.accepts_cycle(cycle) {
                state.apply_failed(cycle, completed_at, error);
            }
            Vec::new()
        }
        Msg::RefreshRequested => {
            if state.is_stopped() {
                Vec::new()
            } else {
                vec![Effect::RefreshNow]
            }
        }
        Msg::ShutdownRequested => {
            if state.is_stopped() {
                Vec::new()
            } else {
                state.stop();
                vec![Effect::StopPolling]
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
