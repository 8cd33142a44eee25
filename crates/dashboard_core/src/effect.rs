#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Poll now and restart the refresh interval.
    RefreshNow,
    /// Cancel the poller, including any in-flight request.
    StopPolling,
}
