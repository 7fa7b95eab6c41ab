//! # HTTP Adapter
//!
//! [`HttpBackend`] implements the [`Backend`] contract on top of a shared
//! `reqwest::Client`. The client owns the connection pool; cloning it is
//! cheap, so every adapter of a process holds a handle to the same pool.

use crate::backend::{Backend, BackendResult};
use crate::call::{BackendCall, BackendId};
use crate::error::BackendFailure;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Adapter for one backend service reachable over HTTP.
#[derive(Clone)]
pub struct HttpBackend {
    id: BackendId,
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(id: BackendId, base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            id,
            base_url,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn transport_failure(error: &reqwest::Error, timeout: Duration) -> BackendFailure {
    if error.is_timeout() {
        BackendFailure::timed_out(timeout)
    } else {
        BackendFailure::unreachable(error.to_string())
    }
}

#[async_trait]
impl Backend for HttpBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    #[instrument(skip(self, call, timeout), fields(backend = %self.id, operation = call.operation))]
    async fn invoke(&self, call: &BackendCall, timeout: Duration) -> BackendResult {
        let url = self.url(&call.path);
        debug!(method = %call.method, %url, query = ?call.query, "Sending request");

        let mut request = self
            .client
            .request(call.method.into(), &url)
            .timeout(timeout);
        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            let failure = transport_failure(&e, timeout);
            warn!(error = %failure, "Request failed");
            failure
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let failure = transport_failure(&e, timeout);
            warn!(%status, error = %failure, "Reading body failed");
            failure
        })?;

        if !status.is_success() {
            let failure = BackendFailure::from_status(status.as_u16(), &body);
            warn!(%status, kind = %failure.kind, "Backend rejected request");
            return Err(failure);
        }

        let payload = serde_json::from_str(&body).map_err(|e| {
            warn!(%status, error = %e, "Malformed body");
            BackendFailure::invalid_response(format!("body is not valid JSON: {e}"))
        })?;
        info!(%status, "Fragment received");
        Ok(payload)
    }
}
