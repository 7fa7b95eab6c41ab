//! # Recipe Client
//!
//! Reads and writes recipes on the recipe service, the authoritative
//! backend for recipe writes.
use crate::clients::backend_client::BackendClient;
use crate::model::{RecipeId, RecipeRecord, RecipeWrite, RECIPE};
use fanout_framework::{BackendCall, BackendResult, SharedBackend};
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for the recipe service.
#[derive(Clone)]
pub struct RecipeClient {
    backend: SharedBackend,
}

impl RecipeClient {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    pub fn get_recipe_call(id: RecipeId) -> BackendCall {
        BackendCall::get(RECIPE, "get_recipe", format!("/recipes/id/{id}/"))
    }

    pub fn create_recipe_call(recipe: &RecipeWrite) -> BackendCall {
        BackendCall::post(RECIPE, "create_recipe", "/recipes/", recipe.to_body())
    }

    pub fn update_recipe_call(id: RecipeId, recipe: &RecipeWrite) -> BackendCall {
        BackendCall::put(RECIPE, "update_recipe", format!("/recipes/id/{id}/"), recipe.to_body())
    }

    #[instrument(skip(self))]
    pub async fn get_recipe(&self, id: RecipeId, timeout: Duration) -> BackendResult {
        debug!("Sending request");
        self.execute(&Self::get_recipe_call(id), timeout).await
    }

    #[instrument(skip(self, recipe))]
    pub async fn create_recipe(&self, recipe: &RecipeWrite, timeout: Duration) -> BackendResult {
        debug!(?recipe, "Sending request");
        self.execute(&Self::create_recipe_call(recipe), timeout).await
    }

    #[instrument(skip(self, recipe))]
    pub async fn update_recipe(
        &self,
        id: RecipeId,
        recipe: &RecipeWrite,
        timeout: Duration,
    ) -> BackendResult {
        debug!(?recipe, "Sending request");
        self.execute(&Self::update_recipe_call(id, recipe), timeout).await
    }
}

impl BackendClient for RecipeClient {
    type Record = RecipeRecord;

    fn backend(&self) -> &SharedBackend {
        &self.backend
    }
}
