use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use dashboard_engine::{FetchSettings, DEFAULT_ENDPOINT, DEFAULT_INTERVAL};
use log::LevelFilter;
use thiserror::Error;
use url::Url;

use super::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Polls the cluster overview endpoint and renders an HTML status page",
    long_about = None
)]
pub struct Cli {
    /// Overview endpoint to poll
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Milliseconds between polls
    #[arg(long, default_value_t = DEFAULT_INTERVAL.as_millis() as u64)]
    pub interval_ms: u64,

    /// Milliseconds before a poll request is abandoned
    #[arg(long, default_value_t = 10_000)]
    pub request_timeout_ms: u64,

    /// Directory receiving dashboard.html (and dashboard.log)
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Poll once, write the page and exit
    #[arg(long)]
    pub once: bool,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal)]
    pub log: LogDestination,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub endpoint: Url,
    pub interval: Duration,
    pub fetch: FetchSettings,
    pub output_dir: PathBuf,
    pub once: bool,
    pub log_destination: LogDestination,
    pub log_level: LevelFilter,
}

impl Cli {
    pub fn into_config(self) -> Result<DashboardConfig, ConfigError> {
        let endpoint = parse_endpoint(&self.endpoint)?;
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroDuration("--interval-ms"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ZeroDuration("--request-timeout-ms"));
        }

        let fetch = FetchSettings {
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            ..FetchSettings::default()
        };

        Ok(DashboardConfig {
            endpoint,
            interval: Duration::from_millis(self.interval_ms),
            fetch,
            output_dir: self.output_dir,
            once: self.once,
            log_destination: self.log,
            log_level: if self.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        })
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEndpoint {
        endpoint: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|err| invalid(err.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}
