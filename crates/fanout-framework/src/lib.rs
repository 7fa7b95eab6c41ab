//! # Fan-out Framework
//!
//! Building blocks for composite gateways: services that answer one client
//! request by calling several independent backends concurrently and merging
//! what they return into a single resource.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into four layers:
//!
//! 1. **Adapter Layer** ([`Backend`], [`HttpBackend`]) - one outbound call per
//!    invocation, every outcome classified into a [`BackendResult`]
//! 2. **Orchestration Layer** ([`FanOut`]) - concurrent calls joined under one
//!    time budget with an all-or-nothing policy
//! 3. **Projection Layer** ([`Projection`]) - a declarative table mapping
//!    fragments to a flat [`CompositeResponse`]
//! 4. **Policy Layer** ([`RetryPolicy`]) - optional bounded retries for reads
//!
//! Domain crates supply what is specific to them: the backend identifiers,
//! the calls each composite operation needs and the projection tables. The
//! framework handles concurrency, cancellation, timeouts and failure
//! classification.
//!
//! ## Request Flow
//!
//! ```text
//! CompositeRequest
//!     │
//!     ▼
//! FanOut ──spawn──► Backend::invoke (recipe)     ─┐
//!        ──spawn──► Backend::invoke (nutrition)  ─┼─ mpsc ──► Fragments
//!        ──spawn──► Backend::invoke (meal_plan)  ─┘              │
//!                                                                 ▼
//!                                                  Projection::project
//!                                                                 │
//!                                                                 ▼
//!                                       CompositeResponse | CompositeError
//! ```
//!
//! ## Failure Model
//!
//! A backend call fails in one of four ways ([`FailureKind`]): `unreachable`,
//! `client_error`, `server_error` or `invalid_response`. The first failure a
//! fan-out observes becomes its [`CompositeError`]; nothing partial is ever
//! returned. See [`error`] for the HTTP status each failure maps to.
//!
//! ## Testing
//!
//! [`mock::MockBackend`] stands in for any backend with queued expectations;
//! combine it with `tokio::time::pause` to test budgets deterministically.

pub mod backend;
pub mod call;
pub mod error;
pub mod fanout;
pub mod http;
pub mod mock;
pub mod projection;
pub mod retry;

// Re-exports for convenience
pub use backend::{Backend, BackendResult, SharedBackend};
pub use call::{BackendCall, BackendId, HttpMethod};
pub use error::{BackendFailure, CompositeError, FailureKind};
pub use fanout::{FanOut, Fragments};
pub use http::HttpBackend;
pub use projection::{Coercion, CompositeResponse, FieldMapping, FieldPath, Presence, Projection};
pub use retry::RetryPolicy;
