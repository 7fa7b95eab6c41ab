//! The wired gateway against real HTTP backends served by `httpmock`.
use axum::body::Body;
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use recipe_gateway::api;
use recipe_gateway::{GatewayConfig, GatewaySystem};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct Backends {
    recipe: MockServer,
    nutrition: MockServer,
    meal_plan: MockServer,
}

impl Backends {
    fn start() -> Self {
        Self {
            recipe: MockServer::start(),
            nutrition: MockServer::start(),
            meal_plan: MockServer::start(),
        }
    }

    fn config(&self, request_timeout_ms: u64) -> GatewayConfig {
        GatewayConfig {
            recipe_url: self.recipe.base_url(),
            nutrition_url: self.nutrition.base_url(),
            meal_plan_url: self.meal_plan.base_url(),
            request_timeout_ms,
            ..GatewayConfig::default()
        }
    }
}

async fn get(system: GatewaySystem, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = api::router(Arc::new(system)).oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, serde_json::from_slice(&body).expect("Body is not JSON"))
}

/// Full end-to-end request: three backends over HTTP, one composite answer.
#[tokio::test]
async fn test_recipe_with_nutrition_over_http() {
    let backends = Backends::start();
    let recipe = backends.recipe.mock(|when, then| {
        when.method(Method::GET).path("/recipes/id/7/");
        then.status(200).json_body(json!({
            "recipe_id": 7, "name": "Stew", "calories": 400, "rating": 4.5,
            "steps": "...", "time_to_cook": 30, "meal_type": "dinner"
        }));
    });
    let nutrition = backends.nutrition.mock(|when, then| {
        when.method(Method::GET).path("/api/nutrition/7");
        then.status(200).json_body(json!({
            "goal": "bulk", "calories": 420, "carbohydrates": 30, "protein": 25, "fiber": 5,
            "fat": 10, "sugar": 3, "sodium": 600, "ingredient_alternatives": "tofu",
            "diet_type": "omnivore"
        }));
    });
    let meal_plan = backends.meal_plan.mock(|when, then| {
        when.method(Method::GET)
            .path("/mealprep")
            .query_param("date", "2024-10-30");
        then.status(200)
            .json_body(json!([[{"week_plan_id": 3, "weeks": 1, "food": "Stew"}]]));
    });

    let system = GatewaySystem::new(backends.config(5_000)).expect("Failed to wire gateway");
    let (status, body) = get(system, "/composite/recipes_with_nutrition/7").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Stew");
    assert_eq!(body["calories_recipe"], 400);
    assert_eq!(body["calories_nutrition"], 420.0);
    assert_eq!(body["week_plan_id"], 3);
    assert_eq!(body["food"], r#"{"week_plan_id":3,"weeks":1,"food":"Stew"}"#);
    recipe.assert();
    nutrition.assert();
    meal_plan.assert();
}

#[tokio::test]
async fn test_backend_outage_is_502() {
    let backends = Backends::start();
    backends.recipe.mock(|when, then| {
        when.method(Method::GET).path("/recipes/id/7/");
        then.status(503).body("maintenance");
    });

    let system = GatewaySystem::new(backends.config(5_000)).unwrap();
    let (status, body) = get(system, "/composite/recipe/7").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], 502);
    assert!(body["detail"].as_str().unwrap().contains("maintenance"));
}

#[tokio::test]
async fn test_slow_backend_is_504() {
    let backends = Backends::start();
    backends.recipe.mock(|when, then| {
        when.method(Method::GET).path("/recipes/id/7/");
        then.status(200).delay(Duration::from_secs(3)).json_body(json!({}));
    });

    let system = GatewaySystem::new(backends.config(200)).unwrap();
    let started = std::time::Instant::now();
    let (status, _) = get(system, "/composite/recipe/7").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_unusable_config_is_rejected() {
    let config = GatewayConfig {
        recipe_url: "not a url".to_string(),
        nutrition_url: "http://nutrition:8001".to_string(),
        meal_plan_url: "http://mealplan:8002".to_string(),
        ..GatewayConfig::default()
    };
    assert!(GatewaySystem::new(config).is_err());
}
