//! Request dispatch to the remote study service.
//!
//! This module defines the [`Transport`] trait that carries JSON to and from
//! the service, and the [`Dispatcher`] that turns a [`StudyRequest`] into a
//! [`StudyResult`]:
//!
//! 1. the request is validated; nothing is sent if a required field is empty
//! 2. exactly one POST goes to the endpoint for the request's task
//! 3. the JSON body is checked for the task's success key and parsed
//!
//! There is no retry, backoff or cancellation. A loading flag is raised for
//! the duration of each call; it is advisory and callers are expected to
//! refuse a second submit while it is set.
//!
//! [`StudyRequest`]: crate::models::StudyRequest
//! [`StudyResult`]: crate::models::StudyResult

mod dispatcher;
mod http;
pub mod mock;

pub use dispatcher::{Dispatcher, Endpoints, LoadingFlag};
pub use http::HttpTransport;
pub use mock::MockTransport;

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{TaskKind, ValidationError};

/// Carries JSON requests to the service and decodes JSON responses.
///
/// Implementations must decode the body whatever the HTTP status: the
/// service reports some failures as JSON bodies with an `error` field.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// POST `body` as `application/json` and decode the response body
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, TransportError>;

    /// GET `url` and decode the response body
    async fn get_json(&self, url: &str) -> Result<Value, TransportError>;
}

/// Transport-level failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection, DNS, TLS or timeout failure
    #[error("Network error: {0}")]
    Network(String),

    /// The response body was not JSON
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TransportError::InvalidBody(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Errors returned by [`Dispatcher::dispatch`]. Every one ends the attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// A required input was missing or malformed; nothing was sent
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// The service could not be reached or answered with something other than JSON
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The service answered without the expected result
    #[error("Service error{}", .0.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
    ServiceError(Option<String>),
}

impl From<TransportError> for DispatchError {
    fn from(err: TransportError) -> Self {
        DispatchError::ConnectionFailed(err.to_string())
    }
}

impl DispatchError {
    /// The alert text shown to the user for a failed `kind` request
    pub fn user_message(&self, kind: TaskKind) -> String {
        match self {
            DispatchError::ValidationFailed(ValidationError::MissingField(_)) => {
                kind.missing_input_message().to_string()
            }
            DispatchError::ValidationFailed(err) => err.to_string(),
            DispatchError::ConnectionFailed(_) => "Backend connection error".to_string(),
            DispatchError::ServiceError(Some(message)) => message.clone(),
            DispatchError::ServiceError(None) => kind.service_error_message().to_string(),
        }
    }
}
