//! Retrying client for the hosted similarity Space.
//!
//! [`SpaceClient`] owns the single session to the remote endpoint and is
//! shared by every request handler. The session lives in one of three
//! states: uninitialized, live, or failed; uninitialized and failed are
//! behaviorally equivalent (both re-establish on next use), so the slot is
//! simply `Option<Arc<SessionHandle>>` behind an async `RwLock` and
//! replacement is an atomic swap. No caller ever observes a half-built
//! handle.
//!
//! Both session establishment and the prediction call retry independently
//! with linear backoff (`backoff_base * attempt_number`, attempts starting
//! at 1). Timeouts bound each individual remote call, never the cumulative
//! retry sequence.

pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod transport;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

#[cfg(test)]
mod tests;

pub use config::SpaceConfig;
pub use decode::decode_similarity;
pub use error::SpaceError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockTransport;
pub use model::{ComparisonRequest, Language};
pub use transport::{GradioTransport, SessionHandle, SpaceTransport, TransportError};

use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Outcome of a single prediction attempt, inspected by the retry loop.
enum AttemptError {
    /// The wire failed; the session is considered dead.
    Transport(TransportError),
    /// The Space answered, but not in a usable shape (raw response inside).
    Protocol(String),
}

/// Client for one remote similarity endpoint.
///
/// Construction never touches the network: a cold or sleeping Space only
/// surfaces once the first call needs a session.
pub struct SpaceClient<T: SpaceTransport> {
    config: SpaceConfig,
    transport: T,
    session: RwLock<Option<Arc<SessionHandle>>>,
}

impl<T: SpaceTransport> SpaceClient<T> {
    /// Creates a client over `transport` with the given endpoint config.
    pub fn new(config: SpaceConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            session: RwLock::new(None),
        }
    }

    /// Returns the endpoint configuration.
    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the live session, establishing one if necessary.
    ///
    /// Establishment is retried up to `max_retries` additional times with
    /// linear backoff. When every attempt fails the slot is left empty (no
    /// partial handle) and a [`SpaceError::Connection`] carries the last
    /// underlying cause.
    pub async fn ensure_session(&self) -> Result<Arc<SessionHandle>, SpaceError> {
        if let Some(handle) = self.session.read().await.as_ref() {
            return Ok(handle.clone());
        }

        let mut slot = self.session.write().await;
        // Another caller may have established the session while we waited
        // for the write lock.
        if let Some(handle) = slot.as_ref() {
            return Ok(handle.clone());
        }

        let attempts = self.config.max_retries + 1;
        let mut last_err: Option<TransportError> = None;

        for attempt in 1..=attempts {
            match self.transport.connect().await {
                Ok(handle) => {
                    info!(
                        space = %self.config.space_url,
                        attempt,
                        "space session established"
                    );
                    let handle = Arc::new(handle);
                    *slot = Some(handle.clone());
                    return Ok(handle);
                }
                Err(e) => {
                    warn!(
                        space = %self.config.space_url,
                        attempt,
                        error = %e,
                        "space session establishment failed"
                    );
                    last_err = Some(e);
                    if attempt < attempts {
                        sleep(self.config.backoff_base * attempt).await;
                    }
                }
            }
        }

        *slot = None;
        Err(SpaceError::Connection {
            message: format!(
                "could not reach '{}' after {attempts} attempt(s)",
                self.config.space_url
            ),
            detail: last_err.map(|e| e.to_string()),
        })
    }

    /// Reports whether the Space is reachable and the configured endpoint is
    /// callable.
    ///
    /// Never propagates an error: any failure, including a malformed API
    /// description, collapses into `false`.
    pub async fn healthcheck(&self) -> bool {
        let Ok(session) = self.ensure_session().await else {
            return false;
        };

        match self.transport.view_api(&session).await {
            Ok(info) => api_lists_endpoint(&info, &self.config.api_name),
            Err(e) => {
                debug!(error = %e, "healthcheck api query failed");
                false
            }
        }
    }

    /// Runs one comparison against the Space and returns the similarity
    /// score.
    ///
    /// Any failed attempt (network, timeout, undecodable shape) is retried
    /// up to `max_retries` more times with linear backoff. A transport-level
    /// failure drops the stored session so the following attempt
    /// re-establishes instead of reusing a known-dead handle. Exhausting the
    /// budget yields [`SpaceError::CallFailed`] with the last cause in its
    /// detail.
    pub async fn compare(&self, request: &ComparisonRequest) -> Result<f64, SpaceError> {
        let mut session = self.ensure_session().await?;
        let attempts = self.config.max_retries + 1;
        let mut last_err: Option<String> = None;

        for attempt in 1..=attempts {
            match self.attempt_predict(&session, request).await {
                Ok(score) => {
                    debug!(attempt, score, "similarity prediction succeeded");
                    return Ok(score);
                }
                Err(AttemptError::Transport(e)) => {
                    warn!(attempt, error = %e, "prediction attempt failed");
                    self.invalidate_session(&session).await;
                    last_err = Some(e.to_string());
                }
                Err(AttemptError::Protocol(raw)) => {
                    warn!(attempt, raw = %raw, "prediction returned an unexpected shape");
                    last_err = Some(raw);
                }
            }

            if attempt < attempts {
                sleep(self.config.backoff_base * attempt).await;
                session = self.ensure_session().await?;
            }
        }

        Err(SpaceError::CallFailed {
            message: format!("exhausted retry budget ({attempts} attempt(s))"),
            detail: last_err,
        })
    }

    async fn attempt_predict(
        &self,
        session: &Arc<SessionHandle>,
        request: &ComparisonRequest,
    ) -> Result<f64, AttemptError> {
        let data = vec![
            json!(request.language.as_str()),
            json!(request.text_a),
            json!(request.text_b),
        ];

        let value = self
            .transport
            .predict(session, &self.config.api_name, data, self.config.timeout)
            .await
            .map_err(AttemptError::Transport)?;

        decode_similarity(&value).map_err(|e| {
            AttemptError::Protocol(e.detail().unwrap_or("no response captured").to_string())
        })
    }

    /// Drops the stored session, but only if it is still the one the caller
    /// failed with; a session another caller already replaced stays.
    async fn invalidate_session(&self, stale: &Arc<SessionHandle>) {
        let mut slot = self.session.write().await;
        if let Some(current) = slot.as_ref() {
            if Arc::ptr_eq(current, stale) {
                *slot = None;
            }
        }
    }
}

/// Checks an API description for the named endpoint.
///
/// A description that is not an object is malformed (unhealthy). One
/// without a `named_endpoints` map is accepted as-is; one with the map must
/// list the endpoint.
fn api_lists_endpoint(info: &serde_json::Value, api_name: &str) -> bool {
    let Some(obj) = info.as_object() else {
        return false;
    };

    match obj.get("named_endpoints") {
        Some(serde_json::Value::Object(endpoints)) => endpoints.contains_key(api_name),
        Some(_) => false,
        None => true,
    }
}
