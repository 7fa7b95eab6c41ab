//! # Fan-out / Fan-in
//!
//! [`FanOut`] issues a set of independent backend calls concurrently and joins
//! them under one time budget.
//!
//! ## Architecture Note
//!
//! Each call runs in its own Tokio task and reports back over an `mpsc`
//! channel, the same message-passing shape the rest of the framework uses.
//! The joining side owns nothing but the receiver and the task handles, so
//! calls of the same request share no mutable state and need no locks.
//!
//! ## Policy
//!
//! - **All-or-nothing**: the first failure received wins. The join returns
//!   immediately with that failure; it does not wait for the siblings.
//! - **Cancellation**: every task still running when the join returns (for
//!   any reason, including the caller dropping the join future) is aborted.
//!   Late results are never read.
//! - **Budget**: when the deadline passes before every call has reported,
//!   the first outstanding call (in the order calls were added) is reported
//!   as `unreachable` with `timed_out` set.
//!
//! ```rust
//! use fanout_framework::{BackendFailure, BackendId, FanOut};
//! use serde_json::json;
//! use std::time::Duration;
//!
//! const RECIPE: BackendId = BackendId::new("recipe");
//! const NUTRITION: BackendId = BackendId::new("nutrition");
//!
//! #[tokio::main]
//! async fn main() {
//!     let fragments = FanOut::new(Duration::from_secs(1))
//!         .call(RECIPE, async { Ok(json!({"recipe_id": 7})) })
//!         .call(NUTRITION, async { Ok(json!({"calories": 420})) })
//!         .join()
//!         .await
//!         .unwrap();
//!     assert_eq!(fragments.len(), 2);
//!
//!     let err = FanOut::new(Duration::from_secs(1))
//!         .call(RECIPE, async { Ok(json!({"recipe_id": 7})) })
//!         .call(NUTRITION, async { Err(BackendFailure::server_error(500, "down")) })
//!         .join()
//!         .await
//!         .unwrap_err();
//!     assert_eq!(err.backend(), NUTRITION);
//! }
//! ```

use crate::backend::BackendResult;
use crate::call::BackendId;
use crate::error::{BackendFailure, CompositeError};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

/// Successful payloads keyed by the backend that produced them.
pub type Fragments = BTreeMap<BackendId, Value>;

type CallFuture = Pin<Box<dyn Future<Output = BackendResult> + Send + 'static>>;

/// A set of concurrent backend calls awaiting a joint outcome.
pub struct FanOut {
    budget: Duration,
    calls: Vec<(BackendId, CallFuture)>,
}

impl FanOut {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            calls: Vec::new(),
        }
    }

    /// Adds one call. Each backend may appear at most once per fan-out.
    #[must_use]
    pub fn call<F>(mut self, backend: BackendId, call: F) -> Self
    where
        F: Future<Output = BackendResult> + Send + 'static,
    {
        debug_assert!(
            self.calls.iter().all(|(existing, _)| *existing != backend),
            "backend {backend} added twice to one fan-out"
        );
        self.calls.push((backend, Box::pin(call)));
        self
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Runs every call concurrently and joins them.
    pub async fn join(self) -> Result<Fragments, CompositeError> {
        let deadline = Instant::now() + self.budget;
        let mut outstanding: Vec<BackendId> = self.calls.iter().map(|(id, _)| *id).collect();
        info!(calls = outstanding.len(), budget_ms = self.budget.as_millis() as u64, "Fan-out started");

        let (sender, mut receiver) = mpsc::channel(self.calls.len().max(1));
        let mut tasks = CallTasks(Vec::with_capacity(self.calls.len()));
        for (backend, call) in self.calls {
            let sender = sender.clone();
            tasks.0.push(tokio::spawn(async move {
                let result = call.await;
                let _ = sender.send((backend, result)).await;
            }));
        }
        drop(sender);

        let mut fragments = Fragments::new();
        while let Some(&next) = outstanding.first() {
            match timeout_at(deadline, receiver.recv()).await {
                Ok(Some((backend, Ok(payload)))) => {
                    debug!(%backend, "Call completed");
                    outstanding.retain(|id| *id != backend);
                    fragments.insert(backend, payload);
                }
                Ok(Some((backend, Err(failure)))) => {
                    warn!(%backend, kind = %failure.kind, error = %failure, "Call failed, short-circuiting");
                    return Err(CompositeError::Backend { backend, failure });
                }
                Ok(None) => {
                    // Every sender is gone but a call never reported: its task panicked.
                    warn!(backend = %next, "Call ended without a result");
                    return Err(CompositeError::Backend {
                        backend: next,
                        failure: BackendFailure::unreachable("call ended without producing a result"),
                    });
                }
                Err(_) => {
                    warn!(backend = %next, pending = outstanding.len(), "Time budget elapsed");
                    return Err(CompositeError::Backend {
                        backend: next,
                        failure: BackendFailure::timed_out(self.budget),
                    });
                }
            }
        }

        info!(fragments = fragments.len(), "Fan-out complete");
        Ok(fragments)
    }
}

/// Aborts whatever is still running when the join is left.
struct CallTasks(Vec<JoinHandle<()>>);

impl Drop for CallTasks {
    fn drop(&mut self) {
        let running = self.0.iter().filter(|task| !task.is_finished()).count();
        if running > 0 {
            debug!(running, "Cancelling outstanding calls");
        }
        for task in &self.0 {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    const RECIPE: BackendId = BackendId::new("recipe");
    const NUTRITION: BackendId = BackendId::new("nutrition");
    const MEAL_PLAN: BackendId = BackendId::new("meal_plan");
    const BUDGET: Duration = Duration::from_secs(2);

    /// Sets its flag when dropped, i.e. when the owning task is cancelled.
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_all_success_collects_every_fragment() {
        let fragments = FanOut::new(BUDGET)
            .call(RECIPE, async { Ok(json!({"calories": 400})) })
            .call(NUTRITION, async { Ok(json!({"calories": 420})) })
            .call(MEAL_PLAN, async { Ok(json!([[{"week_plan_id": 3}]])) })
            .join()
            .await
            .unwrap();

        assert_eq!(fragments.len(), 3);
        assert_eq!(fragments[&RECIPE]["calories"], 400);
        assert_eq!(fragments[&NUTRITION]["calories"], 420);
    }

    #[tokio::test]
    async fn test_empty_fan_out_is_trivially_complete() {
        let fragments = FanOut::new(BUDGET).join().await.unwrap();
        assert!(fragments.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_failure_short_circuits_and_cancels_siblings() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = DropFlag(cancelled.clone());

        let started = Instant::now();
        let err = FanOut::new(BUDGET)
            .call(RECIPE, async move {
                let _flag = flag;
                std::future::pending::<()>().await;
                Ok(json!({}))
            })
            .call(NUTRITION, async {
                Err(BackendFailure::server_error(500, "nutrition down"))
            })
            .join()
            .await
            .unwrap_err();

        assert_eq!(err.backend(), NUTRITION);
        assert_eq!(err.kind(), FailureKind::ServerError);
        assert!(started.elapsed() < BUDGET, "must not wait for the pending sibling");

        for _ in 0..10 {
            if cancelled.load(Ordering::SeqCst) {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(cancelled.load(Ordering::SeqCst), "pending sibling was not cancelled");
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_elapsing_reports_pending_call_as_timed_out() {
        let started = Instant::now();
        let err = FanOut::new(BUDGET)
            .call(RECIPE, async { Ok(json!({"recipe_id": 7})) })
            .call(MEAL_PLAN, async {
                std::future::pending::<()>().await;
                Ok(json!([]))
            })
            .join()
            .await
            .unwrap_err();

        assert_eq!(err.backend(), MEAL_PLAN);
        assert_eq!(err.kind(), FailureKind::Unreachable);
        assert!(err.timed_out());
        assert!(started.elapsed() >= BUDGET);
        assert!(started.elapsed() < BUDGET + Duration::from_millis(50));
    }

    async fn broken_adapter() -> BackendResult {
        panic!("adapter bug")
    }

    #[tokio::test]
    async fn test_panicking_call_is_reported_as_unreachable() {
        let err = FanOut::new(BUDGET)
            .call(RECIPE, broken_adapter())
            .join()
            .await
            .unwrap_err();

        assert_eq!(err.backend(), RECIPE);
        assert_eq!(err.kind(), FailureKind::Unreachable);
        assert!(!err.timed_out());
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_order_does_not_matter() {
        let fragments = FanOut::new(BUDGET)
            .call(RECIPE, async {
                tokio::time::sleep(Duration::from_millis(300)).await;
                Ok(json!({"calories": 400}))
            })
            .call(NUTRITION, async { Ok(json!({"calories": 420})) })
            .join()
            .await
            .unwrap();

        assert_eq!(fragments[&RECIPE]["calories"], 400);
        assert_eq!(fragments[&NUTRITION]["calories"], 420);
    }
}
