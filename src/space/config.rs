//! Remote endpoint configuration.

use std::time::Duration;

/// Configuration for one remote similarity endpoint.
///
/// Immutable after construction; the builder-style setters consume `self`.
#[derive(Debug, Clone)]
pub struct SpaceConfig {
    /// Base URL of the Space.
    pub space_url: String,

    /// Named endpoint to invoke, e.g. `/_on_click`.
    pub api_name: String,

    /// Timeout applied to each individual remote call, never to the
    /// cumulative retry sequence.
    pub timeout: Duration,

    /// Additional attempts after the first failure (so `max_retries = 2`
    /// means three attempts total).
    pub max_retries: u32,

    /// Base delay between attempts, scaled linearly by attempt number.
    pub backoff_base: Duration,
}

impl SpaceConfig {
    /// Creates a configuration for `space_url` with the stock defaults.
    pub fn new(space_url: impl Into<String>) -> Self {
        Self {
            space_url: space_url.into(),
            api_name: "/_on_click".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            backoff_base: Duration::from_secs_f64(1.5),
        }
    }

    /// Sets the named endpoint to invoke.
    pub fn api_name(mut self, api_name: impl Into<String>) -> Self {
        self.api_name = api_name.into();
        self
    }

    /// Sets the per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry budget.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the backoff base delay.
    pub fn backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }
}
