//! # Nutrition Client
use crate::clients::backend_client::BackendClient;
use crate::model::{NutritionRecord, RecipeId, NUTRITION};
use fanout_framework::{BackendCall, BackendResult, SharedBackend};
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for the nutrition service. Nutrition facts are keyed by recipe id.
#[derive(Clone)]
pub struct NutritionClient {
    backend: SharedBackend,
}

impl NutritionClient {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    pub fn get_nutrition_call(id: RecipeId) -> BackendCall {
        BackendCall::get(NUTRITION, "get_nutrition", format!("/api/nutrition/{id}"))
    }

    #[instrument(skip(self))]
    pub async fn get_nutrition(&self, id: RecipeId, timeout: Duration) -> BackendResult {
        debug!("Sending request");
        self.execute(&Self::get_nutrition_call(id), timeout).await
    }
}

impl BackendClient for NutritionClient {
    type Record = NutritionRecord;

    fn backend(&self) -> &SharedBackend {
        &self.backend
    }
}
