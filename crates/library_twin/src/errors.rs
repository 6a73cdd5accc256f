//! Error types
//!
//! None of these are fatal to the host: navigation errors leave the agent
//! where it is, bridge errors drop the offending payload.

use thiserror::Error;

/// Navigation request failures (reported to the host, agent state unchanged)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("location not found: {location_id}")]
    LocationNotFound { location_id: String },
}

/// Failures crossing the host ↔ twin boundary
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("malformed bridge payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("bridge channel closed")]
    ChannelClosed,
}

/// Configuration loading failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("invalid config value {field}: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}
