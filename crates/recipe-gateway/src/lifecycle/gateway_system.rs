use crate::api;
use crate::clients::{MealPlanClient, NutritionClient, RecipeClient};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::model::{MEAL_PLAN, NUTRITION, RECIPE};
use crate::orchestrator::Aggregator;
use crate::write_router::WriteRouter;
use fanout_framework::{HttpBackend, SharedBackend};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// The wired gateway: read orchestration, write routing and the config they
/// were built from.
///
/// # Example
///
/// ```ignore
/// let system = GatewaySystem::new(GatewayConfig::load(None)?)?;
/// system.run(tokio::signal::ctrl_c()).await?;
/// ```
pub struct GatewaySystem {
    pub aggregator: Aggregator,
    pub writes: WriteRouter,
    config: GatewayConfig,
}

impl GatewaySystem {
    /// Builds the HTTP adapters for the configured backends.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()?;

        let recipe: SharedBackend =
            Arc::new(HttpBackend::new(RECIPE, &config.recipe_url, client.clone()));
        let nutrition: SharedBackend =
            Arc::new(HttpBackend::new(NUTRITION, &config.nutrition_url, client.clone()));
        let meal_plan: SharedBackend =
            Arc::new(HttpBackend::new(MEAL_PLAN, &config.meal_plan_url, client));

        info!(
            recipe = %config.recipe_url,
            nutrition = %config.nutrition_url,
            meal_plan = %config.meal_plan_url,
            "Backends configured"
        );
        Ok(Self::with_backends(config, recipe, nutrition, meal_plan))
    }

    /// Wires the given adapters, whatever they are.
    pub fn with_backends(
        config: GatewayConfig,
        recipe: SharedBackend,
        nutrition: SharedBackend,
        meal_plan: SharedBackend,
    ) -> Self {
        let budget = config.request_timeout();
        let recipes = RecipeClient::new(recipe);
        let aggregator = Aggregator::new(
            recipes.clone(),
            NutritionClient::new(nutrition),
            MealPlanClient::new(meal_plan),
            budget,
            config.read_retry_policy(),
            config.meal_plan_date,
        );
        let writes = WriteRouter::new(recipes, budget);

        Self {
            aggregator,
            writes,
            config,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Serves the API on the configured address until `shutdown` resolves.
    pub async fn run<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.bind_addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;
        info!(%addr, "Gateway listening");

        axum::serve(listener, api::router(Arc::new(self)))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(GatewayError::Serve)?;

        info!("Gateway stopped");
        Ok(())
    }
}
