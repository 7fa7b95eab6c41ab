//! # Write-Path Router
//!
//! Recipe writes are not fanned out. The recipe service is the single
//! authoritative backend: the router forwards the validated payload to it
//! once, under the same time budget as reads, and relays the answer through
//! the single-fragment [`mapping::recipe_write`] table. Writes are never
//! retried.

use crate::clients::RecipeClient;
use crate::mapping;
use crate::model::{WriteOperation, WriteRequest, RECIPE};
use fanout_framework::{BackendFailure, CompositeError, CompositeResponse, Fragments};
use std::time::Duration;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct WriteRouter {
    recipes: RecipeClient,
    budget: Duration,
}

impl WriteRouter {
    pub fn new(recipes: RecipeClient, budget: Duration) -> Self {
        Self { recipes, budget }
    }

    #[instrument(skip(self, request), fields(operation = request.operation.name()))]
    pub async fn forward(&self, request: WriteRequest) -> Result<CompositeResponse, CompositeError> {
        let WriteRequest { operation, payload } = request;
        let call = async {
            match operation {
                WriteOperation::Create => self.recipes.create_recipe(&payload, self.budget).await,
                WriteOperation::Update { recipe_id } => {
                    self.recipes
                        .update_recipe(recipe_id, &payload, self.budget)
                        .await
                }
            }
        };

        let fragment = tokio::time::timeout(self.budget, call)
            .await
            .unwrap_or_else(|_| Err(BackendFailure::timed_out(self.budget)))
            .map_err(|failure| {
                warn!(kind = %failure.kind, error = %failure, "Write failed");
                CompositeError::Backend {
                    backend: RECIPE,
                    failure,
                }
            })?;

        let response = mapping::recipe_write().project(&Fragments::from([(RECIPE, fragment)]))?;
        info!(fields = response.len(), "Write relayed");
        Ok(response)
    }
}
