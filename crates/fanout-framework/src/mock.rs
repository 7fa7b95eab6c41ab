//! # Mock Backends
//!
//! `MockBackend` implements the [`Backend`] contract entirely in memory. Tests
//! queue expectations describing which calls should arrive and how each one
//! is answered, hand the mock to the code under test, then call `verify()`.
//!
//! ## When to use Mocks vs a Local Server
//!
//! | Feature | MockBackend | `HttpBackend` + `httpmock` |
//! |---------|-------------|----------------------------|
//! | **Speed** | Instant | Real sockets |
//! | **Time control** | Works with `tokio::time::pause` | Wall clock only |
//! | **Covers** | Orchestration, projection, routing | Status and body classification |
//! | **Failure injection** | Any `BackendFailure` directly | Only what HTTP can express |
//!
//! ```rust
//! use fanout_framework::mock::MockBackend;
//! use fanout_framework::{Backend, BackendCall, BackendFailure, BackendId};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! const RECIPE: BackendId = BackendId::new("recipe");
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockBackend::new(RECIPE);
//!     mock.expect_get("/recipes/id/7/").return_json(json!({"recipe_id": 7}));
//!     mock.expect_get("/recipes/id/8/").return_failure(BackendFailure::client_error(404, "missing"));
//!
//!     let budget = Duration::from_secs(1);
//!     let found = mock.invoke(&BackendCall::get(RECIPE, "get_recipe", "/recipes/id/7/"), budget).await;
//!     let missing = mock.invoke(&BackendCall::get(RECIPE, "get_recipe", "/recipes/id/8/"), budget).await;
//!
//!     assert_eq!(found.unwrap()["recipe_id"], 7);
//!     assert!(missing.is_err());
//!     mock.verify();
//! }
//! ```
//!
//! Calls are matched against the oldest pending expectation with the same
//! method and path, so concurrent calls to different paths may arrive in any
//! order. A call nothing expects is answered with an `unreachable` failure
//! and reported by `verify()`.

use crate::backend::{Backend, BackendResult};
use crate::call::{BackendCall, BackendId, HttpMethod};
use crate::error::BackendFailure;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum Response {
    Json(Value),
    Failure(BackendFailure),
    Never,
}

/// An expected call to the mock backend.
struct Expectation {
    method: HttpMethod,
    path: String,
    delay: Option<Duration>,
    response: Response,
}

impl Expectation {
    fn matches(&self, call: &BackendCall) -> bool {
        self.method == call.method && self.path == call.path
    }
}

/// A backend double with expectation tracking.
#[derive(Clone)]
pub struct MockBackend {
    id: BackendId,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
    calls: Arc<Mutex<Vec<BackendCall>>>,
    unexpected: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Creates a mock with no expectations.
    pub fn new(id: BackendId) -> Self {
        Self {
            id,
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            unexpected: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Expects one call with `method` on `path`.
    pub fn expect(&self, method: HttpMethod, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.into(),
            delay: None,
            expectations: self.expectations.clone(),
        }
    }

    pub fn expect_get(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(HttpMethod::Get, path)
    }

    pub fn expect_post(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(HttpMethod::Post, path)
    }

    pub fn expect_put(&self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(HttpMethod::Put, path)
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let unexpected = self.unexpected.lock().unwrap();
        if !unexpected.is_empty() {
            panic!("{} received unexpected calls: {:?}", self.id, *unexpected);
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            let pending: Vec<String> = exps
                .iter()
                .map(|e| format!("{} {}", e.method, e.path))
                .collect();
            panic!(
                "Not all expectations were met on {}. {} remaining: {:?}",
                self.id,
                exps.len(),
                pending
            );
        }
    }

    fn take_expectation(&self, call: &BackendCall) -> Option<Expectation> {
        let mut exps = self.expectations.lock().unwrap();
        let position = exps.iter().position(|e| e.matches(call))?;
        exps.remove(position)
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn id(&self) -> BackendId {
        self.id
    }

    async fn invoke(&self, call: &BackendCall, timeout: Duration) -> BackendResult {
        self.calls.lock().unwrap().push(call.clone());

        let Some(expectation) = self.take_expectation(call) else {
            let description = format!("{} {}", call.method, call.path);
            self.unexpected.lock().unwrap().push(description.clone());
            return Err(BackendFailure::unreachable(format!(
                "mock {} has no expectation for {description}",
                self.id
            )));
        };

        let respond = async move {
            if let Some(delay) = expectation.delay {
                tokio::time::sleep(delay).await;
            }
            match expectation.response {
                Response::Json(value) => Ok(value),
                Response::Failure(failure) => Err(failure),
                Response::Never => std::future::pending().await,
            }
        };

        tokio::time::timeout(timeout, respond)
            .await
            .unwrap_or_else(|_| Err(BackendFailure::timed_out(timeout)))
    }
}

/// Builder for one expectation. Finish it with one of the `return_*` methods
/// or `never_respond`.
pub struct ExpectationBuilder {
    method: HttpMethod,
    path: String,
    delay: Option<Duration>,
    expectations: Arc<Mutex<VecDeque<Expectation>>>,
}

impl ExpectationBuilder {
    /// Delays the answer by `delay`.
    #[must_use]
    pub fn respond_after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answers with a successful JSON fragment.
    pub fn return_json(self, value: Value) {
        self.push(Response::Json(value));
    }

    /// Answers with a classified failure.
    pub fn return_failure(self, failure: BackendFailure) {
        self.push(Response::Failure(failure));
    }

    /// Never answers; the call ends only when its timeout elapses or it is cancelled.
    pub fn never_respond(self) {
        self.push(Response::Never);
    }

    fn push(self, response: Response) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back(Expectation {
            method: self.method,
            path: self.path,
            delay: self.delay,
            response,
        });
    }
}
