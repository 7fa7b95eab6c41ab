//! # BackendClient Trait
//!
//! Provides a common `execute` for backend-specific clients: one adapter
//! call followed by schema validation of the fragment.
use async_trait::async_trait;
use fanout_framework::{BackendCall, BackendFailure, BackendResult, SharedBackend};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Trait for backend-specific clients to inherit validated execution.
///
/// A 2xx answer whose body does not satisfy `Record` is a failure
/// (`invalid_response`), not a fragment with holes in it.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// The schema every successful answer must satisfy.
    type Record: DeserializeOwned + Send;

    fn backend(&self) -> &SharedBackend;

    fn validate(payload: &Value) -> Result<Self::Record, BackendFailure> {
        Self::Record::deserialize(payload).map_err(|e| {
            BackendFailure::invalid_response(format!("response does not match the expected schema: {e}"))
        })
    }

    #[instrument(skip(self, call, timeout), fields(backend = %call.backend, operation = call.operation))]
    async fn execute(&self, call: &BackendCall, timeout: Duration) -> BackendResult {
        debug!("Executing");
        let payload = self.backend().invoke(call, timeout).await?;
        if let Err(failure) = Self::validate(&payload) {
            warn!(error = %failure, "Fragment rejected");
            return Err(failure);
        }
        Ok(payload)
    }
}
