//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// Space URL is not an http(s) URL.
    #[error("invalid space url '{value}': must start with http:// or https://")]
    InvalidSpaceUrl { value: String },

    /// Per-call timeout must be at least one second.
    #[error("invalid timeout '{value}': must be greater than zero")]
    InvalidTimeout { value: String },

    /// Backoff base must be a finite, non-negative number of seconds.
    #[error("invalid backoff base '{value}': must be finite and non-negative")]
    InvalidBackoff { value: String },
}
