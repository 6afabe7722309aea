#![forbid(unsafe_code)]

//! Subscriber setup for hosts that do not install their own.
//!
//! Every taskdeck component logs through `tracing` under a `taskdeck.*`
//! target (`taskdeck.gesture`, `taskdeck.drag`, `taskdeck.dissolve`,
//! `taskdeck.layout`, `taskdeck.panel`, `taskdeck.toast`, `taskdeck.config`).
//! Libraries never install a subscriber; call [`init`] once from the host if
//! you want the output.
//!
//! The filter comes from `TASKDECK_LOG` (standard `EnvFilter` directives, for
//! example `taskdeck.drag=debug`), falling back to the configured default.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "TASKDECK_LOG";

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable terminal output.
    #[default]
    Pretty,
    /// One JSON object per line. Requires the `tracing-json` feature; without
    /// it this falls back to `Pretty`.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Filter used when `TASKDECK_LOG` is unset or unparsable.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            default_filter: "warn".to_owned(),
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// A global subscriber was already installed.
#[derive(Debug)]
pub struct LogInitError(tracing_subscriber::util::TryInitError);

impl std::fmt::Display for LogInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to install log subscriber: {}", self.0)
    }
}

impl std::error::Error for LogInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

/// Install the global subscriber.
pub fn init(config: &LogConfig) -> Result<(), LogInitError> {
    let filter = config.env_filter();
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        #[cfg(feature = "tracing-json")]
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(false),
            )
            .try_init(),
        _ => registry
            .with(fmt::layer().with_target(true).compact())
            .try_init(),
    }
    .map_err(LogInitError)
}

/// [`init`] with the default configuration.
pub fn init_default() -> Result<(), LogInitError> {
    init(&LogConfig::default())
}
