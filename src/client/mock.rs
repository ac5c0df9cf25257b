//! Mock transport for testing purposes.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Mutex, PoisonError};

use super::{LoadingFlag, Transport, TransportError};

/// A request the mock received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// A transport that returns predefined bodies keyed by URL path suffix.
///
/// Unconfigured paths answer `{}`.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<Vec<(String, Result<Value, TransportError>)>>,
    calls: Mutex<Vec<RecordedCall>>,
    watched: Option<LoadingFlag>,
    loading_seen: Mutex<Vec<bool>>,
}

impl MockTransport {
    /// Create a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state of `flag` every time a request arrives
    pub fn watch_loading(mut self, flag: LoadingFlag) -> Self {
        self.watched = Some(flag);
        self
    }

    /// Answer requests to `path` with `body`
    pub fn respond_to(&self, path: &str, body: Value) {
        self.set(path, Ok(body));
    }

    /// Fail requests to `path` with `error`
    pub fn fail_with(&self, path: &str, error: TransportError) {
        self.set(path, Err(error));
    }

    fn set(&self, path: &str, outcome: Result<Value, TransportError>) {
        let mut guard = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        guard.retain(|(p, _)| p != path);
        guard.push((path.to_string(), outcome));
    }

    /// Every request received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Loading flag values observed while requests were in flight
    pub fn loading_seen(&self) -> Vec<bool> {
        self.loading_seen.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn answer(&self, method: &'static str, url: &str, body: Option<&Value>) -> Result<Value, TransportError> {
        if let Some(flag) = &self.watched {
            self.loading_seen.lock().unwrap_or_else(PoisonError::into_inner).push(flag.is_set());
        }

        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(RecordedCall {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });

        let guard = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .iter()
            .find(|(path, _)| url.ends_with(path.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or_else(|| Ok(json!({})))
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        self.answer("POST", url, Some(body))
    }

    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        self.answer("GET", url, None)
    }
}
