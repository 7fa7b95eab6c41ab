//! # Recipe Gateway
//!
//! A composite gateway in front of three backend services:
//!
//! - **recipe** (authoritative for recipe writes)
//! - **nutrition** (nutrition facts keyed by recipe id)
//! - **meal plan** (week plans by day)
//!
//! Reads fan out to the services an operation needs and merge their answers
//! into one flat resource; writes go to the recipe service alone. Either the
//! client gets every field of the composite resource or it gets one error.
//!
//! ## Modules
//!
//! - **[model]**: backend record schemas and the inbound request types
//! - **[clients]**: typed clients knowing each service's paths and schema
//! - **[mapping]**: the projection table of every composite operation
//! - **[orchestrator]**: concurrent reads under one budget
//! - **[write_router]**: single-backend writes
//! - **[config]**: layered configuration
//! - **[lifecycle]**: wiring, serving and shutdown
//! - **[api]**: the axum router
//!
//! See [`fanout_framework::mock`] for testing clients and orchestration
//! without a network.

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod mapping;
pub mod model;
pub mod orchestrator;
pub mod write_router;

pub use config::{ConfigError, GatewayConfig};
pub use error::GatewayError;
pub use lifecycle::GatewaySystem;
