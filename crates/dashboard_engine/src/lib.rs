//! Dashboard engine: overview fetching, periodic polling and page output.
mod decode;
mod engine;
mod fetch;
mod persist;
mod poll;
mod types;

pub use decode::{decode_body, DecodeError};
pub use engine::{EngineError, EngineHandle};
pub use fetch::{FetchSettings, OverviewFetcher, ReqwestFetcher};
pub use persist::{ensure_output_dir, PagePublisher, PersistError, DEFAULT_PAGE_FILENAME};
pub use poll::{
    ChannelEventSink, Clock, EventSink, PollSettings, Poller, DEFAULT_ENDPOINT, DEFAULT_INTERVAL,
};
pub use types::{EngineEvent, FailureKind, FetchError, PollOutcome};
