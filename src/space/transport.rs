//! HTTP transport for the Gradio API exposed by the Space.
//!
//! [`SpaceTransport`] is the seam between the retrying client and the wire:
//! the real [`GradioTransport`] speaks the Gradio HTTP API, the mock in
//! [`super::mock`] scripts outcomes for tests.

use std::time::Duration;

use serde_json::{Value, json};
use thiserror::Error;
use uuid::Uuid;

/// A live session with the Space.
///
/// Holds the app config fetched at establishment plus a generated session
/// hash sent along with every prediction. Replaced wholesale on
/// re-establishment; callers hold it behind an `Arc` so replacement is an
/// atomic swap.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    /// Random per-session identifier forwarded to the Space.
    pub session_hash: String,
    /// The Space's app config as fetched at connect time.
    pub app_config: Value,
}

impl SessionHandle {
    /// Wraps a fetched app config in a fresh session.
    pub fn new(app_config: Value) -> Self {
        Self {
            session_hash: Uuid::new_v4().to_string(),
            app_config,
        }
    }
}

/// Errors produced by a transport implementation.
///
/// `Clone` so mocks can replay a scripted failure across attempts.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Could not build the underlying HTTP client.
    #[error("failed to build http client: {message}")]
    ClientBuild {
        /// Error message.
        message: String,
    },

    /// Network-level failure reaching the endpoint.
    #[error("request to '{url}' failed: {message}")]
    Network {
        /// Request URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The per-call timeout elapsed.
    #[error("request to '{url}' timed out")]
    Timeout {
        /// Request URL.
        url: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("'{url}' returned status {status}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The endpoint reported an application-level error.
    #[error("'{url}' reported an error: {message}")]
    Api {
        /// Request URL.
        url: String,
        /// Error payload from the endpoint.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response from '{url}': {message}")]
    Decode {
        /// Request URL.
        url: String,
        /// Error message.
        message: String,
    },
}

impl TransportError {
    fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else {
            TransportError::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Minimal async interface the retrying client needs from the wire.
pub trait SpaceTransport: Send + Sync {
    /// Establishes a fresh session with the endpoint.
    fn connect(&self)
    -> impl std::future::Future<Output = Result<SessionHandle, TransportError>> + Send;

    /// Fetches the endpoint's API description.
    fn view_api(
        &self,
        session: &SessionHandle,
    ) -> impl std::future::Future<Output = Result<Value, TransportError>> + Send;

    /// Invokes the named endpoint with positional inputs, bounded by
    /// `timeout`, returning the unwrapped prediction value.
    fn predict(
        &self,
        session: &SessionHandle,
        api_name: &str,
        data: Vec<Value>,
        timeout: Duration,
    ) -> impl std::future::Future<Output = Result<Value, TransportError>> + Send;
}

#[derive(Clone)]
/// Transport speaking the Gradio HTTP API over reqwest.
pub struct GradioTransport {
    http: reqwest::Client,
    base_url: String,
}

impl GradioTransport {
    /// Creates a transport for the Space at `space_url`.
    ///
    /// No I/O happens here; a cold or unreachable Space only surfaces once a
    /// session is requested.
    pub fn new(space_url: &str) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: space_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL this transport talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| TransportError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    /// Mirrors the unwrapping the Gradio client library performs: an
    /// endpoint with a single output component yields that value directly,
    /// multiple outputs yield the sequence.
    fn unwrap_prediction(url: &str, body: Value) -> Result<Value, TransportError> {
        if let Some(err) = body.get("error").filter(|v| !v.is_null()) {
            return Err(TransportError::Api {
                url: url.to_string(),
                message: err.to_string(),
            });
        }

        match body.get("data") {
            Some(Value::Array(items)) if items.len() == 1 => Ok(items[0].clone()),
            Some(data) => Ok(data.clone()),
            None => Ok(body),
        }
    }
}

impl SpaceTransport for GradioTransport {
    async fn connect(&self) -> Result<SessionHandle, TransportError> {
        let url = format!("{}/config", self.base_url);
        let app_config = self.get_json(&url).await?;
        Ok(SessionHandle::new(app_config))
    }

    async fn view_api(&self, _session: &SessionHandle) -> Result<Value, TransportError> {
        let url = format!("{}/info", self.base_url);
        self.get_json(&url).await
    }

    async fn predict(
        &self,
        session: &SessionHandle,
        api_name: &str,
        data: Vec<Value>,
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        let url = format!(
            "{}/api/{}/",
            self.base_url,
            api_name.trim_start_matches('/')
        );

        let response = self
            .http
            .post(&url)
            .timeout(timeout)
            .json(&json!({
                "data": data,
                "session_hash": session.session_hash,
            }))
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TransportError::Decode {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Self::unwrap_prediction(&url, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_hashes_are_unique() {
        let a = SessionHandle::new(Value::Null);
        let b = SessionHandle::new(Value::Null);
        assert_ne!(a.session_hash, b.session_hash);
    }

    #[test]
    fn test_unwrap_single_output() {
        let body = json!({"data": [0.42], "duration": 0.1});
        let value = GradioTransport::unwrap_prediction("u", body).expect("should unwrap");
        assert_eq!(value, json!(0.42));
    }

    #[test]
    fn test_unwrap_multi_output_keeps_sequence() {
        let body = json!({"data": ["label", 0.87]});
        let value = GradioTransport::unwrap_prediction("u", body).expect("should unwrap");
        assert_eq!(value, json!(["label", 0.87]));
    }

    #[test]
    fn test_unwrap_passes_through_unshaped_body() {
        let body = json!({"unexpected": "shape"});
        let value = GradioTransport::unwrap_prediction("u", body.clone()).expect("should pass");
        assert_eq!(value, body);
    }

    #[test]
    fn test_unwrap_surfaces_space_errors() {
        let body = json!({"error": "queue full"});
        let err = GradioTransport::unwrap_prediction("u", body).expect_err("should error");
        assert!(matches!(err, TransportError::Api { .. }));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let transport = GradioTransport::new("http://localhost:7860/").expect("should build");
        assert_eq!(transport.base_url(), "http://localhost:7860");
    }
}
