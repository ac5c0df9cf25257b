//! The request dispatcher shared by all four study tools.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use url::Url;

use super::{DispatchError, Transport};
use crate::models::{StudyRequest, StudyResult, TaskKind};
use crate::utils::{validate_base_url, InputError};

/// Advisory in-flight marker, cheap to clone and share with UI code
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a dispatch is currently in flight
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn raise(&self) -> LoadingGuard<'_> {
        self.0.store(true, Ordering::SeqCst);
        LoadingGuard(&self.0)
    }
}

/// Clears the flag when the dispatch settles, on every path
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Service addresses: one shared base plus optional per-task bases.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: Url,
    overrides: HashMap<TaskKind, Url>,
}

impl Endpoints {
    /// Use `base_url` for every task
    pub fn new(base_url: &str) -> Result<Self, InputError> {
        Ok(Self {
            base_url: validate_base_url(base_url)?,
            overrides: HashMap::new(),
        })
    }

    /// Send `kind` requests to a different base address
    pub fn with_override(mut self, kind: TaskKind, base_url: &str) -> Result<Self, InputError> {
        self.overrides.insert(kind, validate_base_url(base_url)?);
        Ok(self)
    }

    /// The shared base address
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base address override for `kind`, if configured
    pub fn override_for(&self, kind: TaskKind) -> Option<&Url> {
        self.overrides.get(&kind)
    }

    /// Full URL for `kind`
    pub fn url_for(&self, kind: TaskKind) -> String {
        let base = match self.overrides.get(&kind) {
            Some(base) => {
                tracing::debug!("Using {} endpoint override {}", kind, base);
                base
            }
            None => &self.base_url,
        };
        join(base, kind.endpoint())
    }

    /// URL of the service health check
    pub fn health_url(&self) -> String {
        join(&self.base_url, "/")
    }
}

fn join(base: &Url, path: &str) -> String {
    format!("{}{}", base.as_str().trim_end_matches('/'), path)
}

/// Validates, sends and parses study requests.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    loading: LoadingFlag,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, endpoints: Endpoints) -> Self {
        Self {
            transport,
            endpoints,
            loading: LoadingFlag::new(),
        }
    }

    /// Share an externally owned loading flag
    pub fn with_loading_flag(mut self, flag: LoadingFlag) -> Self {
        self.loading = flag;
        self
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Whether a dispatch is in flight
    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Send one request and parse its result.
    ///
    /// Validation happens before any network activity. Exactly one POST is
    /// issued otherwise; there is no timeout beyond the transport's and no retry.
    pub async fn dispatch(&self, request: &StudyRequest) -> Result<StudyResult, DispatchError> {
        let kind = request.kind();
        let payload = request.validate().map_err(|e| {
            tracing::debug!("Rejected {} request: {}", kind, e);
            DispatchError::ValidationFailed(e)
        })?;

        let body = serde_json::to_value(&payload)
            .map_err(|e| DispatchError::ConnectionFailed(format!("Failed to encode request: {}", e)))?;
        let url = self.endpoints.url_for(kind);

        tracing::debug!("Dispatching {} request to {}", kind, url);

        let response = {
            let _loading = self.loading.raise();
            self.transport.post_json(&url, &body).await
        };

        let response = response.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", url, e);
            DispatchError::from(e)
        })?;

        match StudyResult::from_response(kind, &response) {
            Ok(result) => {
                tracing::info!("Received {} result from {}", kind, url);
                Ok(result)
            }
            Err(failure) => {
                tracing::warn!(
                    "{} response missing '{}'{}",
                    kind,
                    kind.success_key(),
                    failure
                        .message
                        .as_ref()
                        .map(|m| format!(": {}", m))
                        .unwrap_or_default()
                );
                Err(DispatchError::ServiceError(failure.message))
            }
        }
    }

    /// Query the service root and return its banner message
    pub async fn health(&self) -> Result<String, DispatchError> {
        let url = self.endpoints.health_url();
        let response = self.transport.get_json(&url).await?;

        Ok(response
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| response.to_string()))
    }
}
