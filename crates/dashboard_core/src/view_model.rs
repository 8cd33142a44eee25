use crate::LoadStatus;

pub const TABLE_HEADER: [&str; 4] = ["ID", "Cluster Name", "Status", "Progress"];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardViewModel {
    pub status: LoadStatus,
    /// Present only while the last poll succeeded.
    pub table: Option<TableView>,
    pub banner: Option<String>,
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub header: [&'static str; 4],
    pub rows: Vec<JobRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub key: String,
    pub run_id: String,
    pub cluster: String,
    pub status: String,
    pub progress: ProgressView,
}

/// Raw progress bounds, passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressView {
    pub value: Option<u64>,
    pub max: Option<u64>,
}
