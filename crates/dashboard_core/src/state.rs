use std::fmt;

use crate::view_model::{DashboardViewModel, JobRowView, ProgressView, TableView, TABLE_HEADER};
use crate::JobCollection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// No poll has completed yet.
    #[default]
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// The endpoint could not be reached or answered with a non-success status.
    Fetch,
    /// The body was not a usable overview document.
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub kind: LoadErrorKind,
    pub message: String,
}

impl LoadError {
    pub fn new(kind: LoadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LoadErrorKind::Fetch => write!(f, "fetch failed: {}", self.message),
            LoadErrorKind::Parse => write!(f, "unreadable overview: {}", self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardState {
    status: LoadStatus,
    records: JobCollection,
    last_error: Option<LoadError>,
    last_cycle: u64,
    last_completed_at: Option<String>,
    stopped: bool,
    dirty: bool,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn last_cycle(&self) -> u64 {
        self.last_cycle
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn view(&self) -> DashboardViewModel {
        let table = match self.status {
            LoadStatus::Ready => Some(TableView {
                header: TABLE_HEADER,
                rows: self
                    .records
                    .iter()
                    .map(|entry| JobRowView {
                        key: entry.key.clone(),
                        run_id: entry.record.run_id.clone().unwrap_or_default(),
                        cluster: entry.record.cluster.clone().unwrap_or_default(),
                        status: entry.record.status.clone().unwrap_or_default(),
                        progress: ProgressView {
                            value: entry.record.done_segments,
                            max: entry.record.total_segments,
                        },
                    })
                    .collect(),
            }),
            LoadStatus::Loading | LoadStatus::Failed => None,
        };
        let footer = self
            .last_completed_at
            .as_ref()
            .map(|at| format!("Poll #{} completed at {}", self.last_cycle, at));

        DashboardViewModel {
            status: self.status,
            table,
            banner: self.last_error.as_ref().map(ToString::to_string),
            footer,
        }
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Poll results can arrive late; only newer cycles are applied.
    pub(crate) fn accepts_cycle(&self, cycle: u64) -> bool {
        !self.stopped && cycle > self.last_cycle
    }

    pub(crate) fn apply_loaded(
        &mut self,
        cycle: u64,
        completed_at: String,
        collection: JobCollection,
    ) {
        self.status = LoadStatus::Ready;
        self.records = collection;
        self.last_error = None;
        self.mark_cycle(cycle, completed_at);
    }

    pub(crate) fn apply_failed(&mut self, cycle: u64, completed_at: String, error: LoadError) {
        self.status = LoadStatus::Failed;
        self.records = JobCollection::default();
        self.last_error = Some(error);
        self.mark_cycle(cycle, completed_at);
    }

    pub(crate) fn stop(&mut self) {
        self.stopped = true;
    }

    fn mark_cycle(&mut self, cycle: u64, completed_at: String) {
        self.last_cycle = cycle;
        self.last_completed_at = Some(completed_at);
        self.dirty = true;
    }
}
