//! # Fan-out Orchestrator
//!
//! [`Aggregator::aggregate`] turns one [`CompositeRequest`] into one
//! [`CompositeResponse`]. The backends an operation needs are fixed by the
//! operation itself; each is called exactly once (plus bounded retries for
//! connection failures), all of them concurrently, under one time budget.
//!
//! ```text
//! recipe_with_nutrition(7)
//!   ├── recipe     GET /recipes/id/7/
//!   ├── nutrition  GET /api/nutrition/7
//!   └── meal_plan  GET /mealprep?date=2024-10-30
//!          │
//!          ▼  all succeeded
//!   mapping::recipe_with_nutrition().project(fragments)
//! ```
//!
//! The first failure wins and cancels the remaining calls; see
//! [`FanOut`] for the exact policy.

use crate::clients::{BackendClient, MealPlanClient, NutritionClient, RecipeClient};
use crate::mapping;
use crate::model::{CompositeOperation, CompositeRequest, MEAL_PLAN, NUTRITION, RECIPE};
use chrono::NaiveDate;
use fanout_framework::{
    BackendCall, BackendResult, CompositeError, CompositeResponse, FanOut, RetryPolicy,
};
use std::future::Future;
use std::time::Duration;
use tracing::{info, instrument};

/// Runs composite read operations.
#[derive(Clone)]
pub struct Aggregator {
    recipes: RecipeClient,
    nutrition: NutritionClient,
    meal_plans: MealPlanClient,
    budget: Duration,
    retry: RetryPolicy,
    default_meal_plan_date: NaiveDate,
}

impl Aggregator {
    pub fn new(
        recipes: RecipeClient,
        nutrition: NutritionClient,
        meal_plans: MealPlanClient,
        budget: Duration,
        retry: RetryPolicy,
        default_meal_plan_date: NaiveDate,
    ) -> Self {
        Self {
            recipes,
            nutrition,
            meal_plans,
            budget,
            retry,
            default_meal_plan_date,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    #[instrument(skip(self), fields(operation = request.operation.name(), recipe_id = %request.recipe_id))]
    pub async fn aggregate(
        &self,
        request: CompositeRequest,
    ) -> Result<CompositeResponse, CompositeError> {
        let id = request.recipe_id;
        let fan_out = match request.operation {
            CompositeOperation::RecipeWithNutrition { meal_plan_date } => {
                let date = meal_plan_date.unwrap_or(self.default_meal_plan_date);
                FanOut::new(self.budget)
                    .call(RECIPE, self.read(&self.recipes, RecipeClient::get_recipe_call(id)))
                    .call(
                        NUTRITION,
                        self.read(&self.nutrition, NutritionClient::get_nutrition_call(id)),
                    )
                    .call(
                        MEAL_PLAN,
                        self.read(&self.meal_plans, MealPlanClient::get_meal_plan_call(date)),
                    )
            }
            CompositeOperation::RecipeDetail => FanOut::new(self.budget)
                .call(RECIPE, self.read(&self.recipes, RecipeClient::get_recipe_call(id))),
        };
        debug_assert_eq!(fan_out.len(), request.operation.required_backends().len());

        let fragments = fan_out.join().await?;
        let response = mapping::for_operation(&request.operation).project(&fragments)?;
        info!(fields = response.len(), "Composite response ready");
        Ok(response)
    }

    /// One read, owned so it can run on its own task.
    fn read<C>(&self, client: &C, call: BackendCall) -> impl Future<Output = BackendResult> + Send + 'static
    where
        C: BackendClient + Clone + 'static,
    {
        let client = client.clone();
        let retry = self.retry;
        let timeout = self.budget;
        async move { retry.run(|| client.execute(&call, timeout)).await }
    }
}
