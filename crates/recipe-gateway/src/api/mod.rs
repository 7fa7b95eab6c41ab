//! # Inbound HTTP Surface
//!
//! | route                                            | operation               |
//! |--------------------------------------------------|-------------------------|
//! | `GET /composite/recipes_with_nutrition/{id}`     | recipe + nutrition + meal plan (`?date=YYYY-MM-DD`) |
//! | `GET /composite/recipe/{id}`                     | recipe detail           |
//! | `POST /composite/recipes`                        | create recipe           |
//! | `PUT /composite/recipes/{id}`                    | update recipe           |
//! | `GET /health`                                    | liveness                |
//!
//! Every failure is answered with `{status, detail}`; see [`error`].

pub mod error;
pub mod handlers;
pub mod middleware;

pub use error::{ApiError, ErrorBody};

use crate::lifecycle::GatewaySystem;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;

pub fn router(system: Arc<GatewaySystem>) -> Router {
    Router::new()
        .route(
            "/composite/recipes_with_nutrition/{recipe_id}",
            get(handlers::recipe_with_nutrition),
        )
        .route("/composite/recipe/{recipe_id}", get(handlers::recipe_detail))
        .route("/composite/recipes", post(handlers::create_recipe))
        .route("/composite/recipes/{recipe_id}", put(handlers::update_recipe))
        .route("/health", get(handlers::health))
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(system)
}
