#![forbid(unsafe_code)]

//! Top-level error for hosts embedding taskdeck.
//!
//! The subsystems keep their own typed errors; this enum only collects the
//! ones a host sees while setting up (loading configuration and installing
//! a log subscriber).

use std::fmt;

use taskdeck_runtime::ConfigError;
use taskdeck_runtime::logging::LogInitError;

/// Setup failure surfaced by the facade.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be read, parsed or validated.
    Config(ConfigError),
    /// A global log subscriber was already installed.
    Log(LogInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration: {err}"),
            Self::Log(err) => write!(f, "logging: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Log(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<LogInitError> for Error {
    fn from(err: LogInitError) -> Self {
        Self::Log(err)
    }
}

/// Standard result type for facade APIs.
pub type Result<T> = std::result::Result<T, Error>;
