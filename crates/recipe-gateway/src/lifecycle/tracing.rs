//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the process-wide `tracing` subscriber. Every
//! layer of the gateway logs through `tracing` with structured fields, so one
//! composite request reads as a short, filterable sequence of lines.
//!
//! ## What Gets Traced
//!
//! - **Adapters**: one span per backend call carrying `backend` and
//!   `operation`; the outgoing request at `debug`, the outcome at `info`/`warn`
//! - **Fan-out**: call count and budget, the backend that short-circuited,
//!   cancelled stragglers
//! - **Projection**: which table ran and how many fields it produced
//! - **Inbound requests**: method, URI, status and elapsed time
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info composite-gateway
//! RUST_LOG=debug composite-gateway
//! RUST_LOG=fanout_framework=debug,recipe_gateway=info composite-gateway
//! ```
//!
//! With `RUST_LOG=info` a recipe-with-nutrition request looks like:
//!
//! ```text
//! INFO request{method=GET uri=/composite/recipes_with_nutrition/7}: Started
//! INFO Fan-out started calls=3 budget_ms=5000
//! INFO invoke{backend=nutrition operation="get_nutrition"}: Fragment received status=200 OK
//! INFO invoke{backend=recipe operation="get_recipe"}: Fragment received status=200 OK
//! INFO invoke{backend=meal_plan operation="get_meal_plan"}: Fragment received status=200 OK
//! INFO Fan-out complete fragments=3
//! INFO request{method=GET uri=/composite/recipes_with_nutrition/7}: Finished status=200 elapsed_ms=12
//! ```

/// Initializes structured logging filtered by `RUST_LOG`.
///
/// Call once at startup; a second call panics because the global subscriber
/// is already set.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
