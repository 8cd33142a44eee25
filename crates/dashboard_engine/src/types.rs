use std::fmt;

use dashboard_core::{JobCollection, LoadError, LoadErrorKind, Msg, ParseError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode { encoding: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode { encoding } => write!(f, "body is not valid {encoding}"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Result of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Loaded(JobCollection),
    FetchFailed(FetchError),
    ParseFailed(ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Polled {
        cycle: u64,
        completed_at: String,
        outcome: PollOutcome,
    },
}

impl From<EngineEvent> for Msg {
    fn from(event: EngineEvent) -> Self {
        let EngineEvent::Polled {
            cycle,
            completed_at,
            outcome,
        } = event;
        match outcome {
            PollOutcome::Loaded(collection) => Msg::OverviewLoaded {
                cycle,
                completed_at,
                collection,
            },
            PollOutcome::FetchFailed(err) => Msg::OverviewFailed {
                cycle,
                completed_at,
                error: LoadError::new(LoadErrorKind::Fetch, err.kind.to_string()),
            },
            PollOutcome::ParseFailed(err) => Msg::OverviewFailed {
                cycle,
                completed_at,
                error: LoadError::new(LoadErrorKind::Parse, err.to_string()),
            },
        }
    }
}
