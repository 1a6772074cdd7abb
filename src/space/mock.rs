//! Scripted transport for exercising the client without a network.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use serde_json::{Value, json};

use super::transport::{SessionHandle, SpaceTransport, TransportError};

/// Transport whose outcomes are scripted per call.
///
/// Each operation pops from its script queue, falling back to a repeatable
/// default once the queue is drained. Call counters let tests assert exact
/// attempt counts.
pub struct MockTransport {
    connect_script: Mutex<VecDeque<Result<(), TransportError>>>,
    connect_fallback: Mutex<Result<(), TransportError>>,
    predict_script: Mutex<VecDeque<Result<Value, TransportError>>>,
    predict_fallback: Mutex<Result<Value, TransportError>>,
    api_info: Mutex<Result<Value, TransportError>>,
    connect_calls: AtomicU32,
    predict_calls: AtomicU32,
    last_inputs: Mutex<Option<Vec<Value>>>,
    last_timeout: Mutex<Option<Duration>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            connect_script: Mutex::new(VecDeque::new()),
            connect_fallback: Mutex::new(Ok(())),
            predict_script: Mutex::new(VecDeque::new()),
            predict_fallback: Mutex::new(Ok(json!(["match", 1.0]))),
            api_info: Mutex::new(Ok(json!({
                "named_endpoints": {
                    "/_on_click": {"parameters": []}
                }
            }))),
            connect_calls: AtomicU32::new(0),
            predict_calls: AtomicU32::new(0),
            last_inputs: Mutex::new(None),
            last_timeout: Mutex::new(None),
        }
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A network-shaped failure usable in scripts.
    pub fn network_error(message: &str) -> TransportError {
        TransportError::Network {
            url: "mock://space".to_string(),
            message: message.to_string(),
        }
    }

    /// Queues `count` connect failures ahead of the fallback outcome.
    pub fn push_connect_failures(&self, count: usize) {
        let mut script = self.connect_script.lock().expect("mock lock poisoned");
        for _ in 0..count {
            script.push_back(Err(Self::network_error("connect refused")));
        }
    }

    /// Sets the outcome every connect gets once the script is drained.
    pub fn set_connect_fallback(&self, outcome: Result<(), TransportError>) {
        *self.connect_fallback.lock().expect("mock lock poisoned") = outcome;
    }

    /// Queues one predict outcome ahead of the fallback.
    pub fn push_predict(&self, outcome: Result<Value, TransportError>) {
        self.predict_script
            .lock()
            .expect("mock lock poisoned")
            .push_back(outcome);
    }

    /// Sets the outcome every predict gets once the script is drained.
    pub fn set_predict_fallback(&self, outcome: Result<Value, TransportError>) {
        *self.predict_fallback.lock().expect("mock lock poisoned") = outcome;
    }

    /// Replaces the API description served by `view_api`.
    pub fn set_api_info(&self, outcome: Result<Value, TransportError>) {
        *self.api_info.lock().expect("mock lock poisoned") = outcome;
    }

    /// Number of connect attempts observed.
    pub fn connect_count(&self) -> u32 {
        self.connect_calls.load(Ordering::SeqCst)
    }

    /// Number of predict attempts observed.
    pub fn predict_count(&self) -> u32 {
        self.predict_calls.load(Ordering::SeqCst)
    }

    /// Positional inputs of the most recent predict call.
    pub fn last_inputs(&self) -> Option<Vec<Value>> {
        self.last_inputs.lock().expect("mock lock poisoned").clone()
    }

    /// Timeout handed to the most recent predict call.
    pub fn last_timeout(&self) -> Option<Duration> {
        *self.last_timeout.lock().expect("mock lock poisoned")
    }
}

impl SpaceTransport for MockTransport {
    async fn connect(&self) -> Result<SessionHandle, TransportError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);

        let outcome = self
            .connect_script
            .lock()
            .expect("mock lock poisoned")
            .pop_front()
            .unwrap_or_else(|| self.connect_fallback.lock().expect("mock lock poisoned").clone());

        outcome.map(|_| SessionHandle::new(json!({"mock": true})))
    }

    async fn view_api(&self, _session: &SessionHandle) -> Result<Value, TransportError> {
        self.api_info.lock().expect("mock lock poisoned").clone()
    }

    async fn predict(
        &self,
        _session: &SessionHandle,
        _api_name: &str,
        data: Vec<Value>,
        timeout: Duration,
    ) -> Result<Value, TransportError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_inputs.lock().expect("mock lock poisoned") = Some(data);
        *self.last_timeout.lock().expect("mock lock poisoned") = Some(timeout);

        self.predict_script
            .lock()
            .expect("mock lock poisoned")
            .pop_front()
            .unwrap_or_else(|| self.predict_fallback.lock().expect("mock lock poisoned").clone())
    }
}
