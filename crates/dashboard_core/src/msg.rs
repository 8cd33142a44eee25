use crate::{JobCollection, LoadError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Poller fetched and parsed the overview.
    OverviewLoaded {
        cycle: u64,
        completed_at: String,
        collection: JobCollection,
    },
    /// Poller cycle ended without usable data.
    OverviewFailed {
        cycle: u64,
        completed_at: String,
        error: LoadError,
    },
    /// Operator asked for an immediate poll.
    RefreshRequested,
    /// Operator or one-shot mode asked the dashboard to stop.
    ShutdownRequested,
    /// Loop heartbeat; never changes state.
    Tick,
    NoOp,
}
