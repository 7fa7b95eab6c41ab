//! # Backend Adapter Contract
//!
//! The [`Backend`] trait is the seam between orchestration and transport.
//! The production implementation is [`HttpBackend`](crate::http::HttpBackend);
//! tests swap in [`MockBackend`](crate::mock::MockBackend).
//!
//! ## Contract
//!
//! - `invoke` performs exactly **one** outbound call. No retries, no caching.
//! - Every outcome is a value. Transport errors, non-2xx answers and bodies
//!   that are not JSON all come back as `Err(BackendFailure)`; nothing panics
//!   or escapes as an uncontrolled error.
//! - The `timeout` bounds the whole call, including reading the body.

use crate::call::{BackendCall, BackendId};
use crate::error::BackendFailure;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one adapter invocation: the JSON fragment or a classified failure.
pub type BackendResult = Result<Value, BackendFailure>;

/// A backend shared between concurrently running requests.
pub type SharedBackend = Arc<dyn Backend>;

#[async_trait]
pub trait Backend: Send + Sync {
    /// The service this adapter talks to.
    fn id(&self) -> BackendId;

    /// Issues `call` and classifies the outcome.
    async fn invoke(&self, call: &BackendCall, timeout: Duration) -> BackendResult;
}
