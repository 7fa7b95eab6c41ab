//! # System Lifecycle
//!
//! Wiring, serving and shutdown of the gateway, plus the process-wide
//! logging setup in [`tracing`](self::tracing).
//!
//! ## The GatewaySystem Pattern
//!
//! [`GatewaySystem`] is built once at startup from an immutable
//! [`GatewayConfig`](crate::config::GatewayConfig):
//!
//! 1. **Connection pool** - one `reqwest::Client` shared by every adapter
//! 2. **Adapters** - an `HttpBackend` per backend service, each with its
//!    base URL injected
//! 3. **Clients** - typed wrappers knowing each service's paths and schema
//! 4. **Orchestration** - the `Aggregator` for reads and the `WriteRouter`
//!    for writes, sharing the request budget
//!
//! Nothing reads the environment after this point. Tests use
//! [`GatewaySystem::with_backends`] to wire mocks in place of the adapters.
//!
//! ## Graceful Shutdown
//!
//! [`GatewaySystem::run`] serves until the shutdown future resolves, then
//! stops accepting connections and lets in-flight requests finish. Their
//! backend calls are bounded by the request budget, so shutdown is too.

pub mod gateway_system;
pub mod tracing;

pub use gateway_system::*;
pub use self::tracing::setup_tracing;
