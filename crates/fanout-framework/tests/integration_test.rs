use fanout_framework::mock::MockBackend;
use fanout_framework::{
    Backend, BackendCall, BackendFailure, BackendId, BackendResult, Coercion, FailureKind, FanOut,
    FieldMapping, FieldPath, Projection, RetryPolicy, SharedBackend,
};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

const RECIPE: BackendId = BackendId::new("recipe");
const NUTRITION: BackendId = BackendId::new("nutrition");
const MEAL_PLAN: BackendId = BackendId::new("meal_plan");
const BUDGET: Duration = Duration::from_secs(5);

fn invoke(backend: &SharedBackend, call: BackendCall) -> impl Future<Output = BackendResult> + Send {
    let backend = backend.clone();
    async move { backend.invoke(&call, BUDGET).await }
}

fn calls() -> [BackendCall; 3] {
    [
        BackendCall::get(RECIPE, "get_recipe", "/recipes/id/7/"),
        BackendCall::get(NUTRITION, "get_nutrition", "/api/nutrition/7"),
        BackendCall::get(MEAL_PLAN, "get_meal_plan", "/mealprep"),
    ]
}

fn projection() -> Projection {
    Projection::new("recipe_summary")
        .field(FieldMapping::new("name", RECIPE, "name").coerce(Coercion::Text))
        .field(FieldMapping::new("calories_recipe", RECIPE, "calories").coerce(Coercion::Integer))
        .field(FieldMapping::new("calories_nutrition", NUTRITION, "calories").coerce(Coercion::Number))
        .field(
            FieldMapping::new(
                "week_plan_id",
                MEAL_PLAN,
                FieldPath::root().index(0).index(0).key("week_plan_id"),
            )
            .coerce(Coercion::Integer),
        )
}

/// Three mocked backends joined and projected, end to end through the framework.
#[tokio::test]
async fn test_fan_out_then_project() {
    let recipe = MockBackend::new(RECIPE);
    let nutrition = MockBackend::new(NUTRITION);
    let meal_plan = MockBackend::new(MEAL_PLAN);
    recipe
        .expect_get("/recipes/id/7/")
        .return_json(json!({"recipe_id": 7, "name": "Stew", "calories": 400}));
    nutrition
        .expect_get("/api/nutrition/7")
        .respond_after(Duration::from_millis(20))
        .return_json(json!({"calories": 420}));
    meal_plan
        .expect_get("/mealprep")
        .return_json(json!([[{"week_plan_id": 3}]]));

    let backends: [SharedBackend; 3] = [
        Arc::new(recipe.clone()),
        Arc::new(nutrition.clone()),
        Arc::new(meal_plan.clone()),
    ];
    let mut fan_out = FanOut::new(BUDGET);
    for (backend, call) in backends.iter().zip(calls()) {
        fan_out = fan_out.call(backend.id(), invoke(backend, call));
    }

    let fragments = fan_out.join().await.expect("fan-out failed");
    let response = projection().project(&fragments).expect("projection failed");

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"name": "Stew", "calories_recipe": 400, "calories_nutrition": 420.0, "week_plan_id": 3})
    );
    recipe.verify();
    nutrition.verify();
    meal_plan.verify();
}

/// A failing nutrition backend fails the whole request; nothing is projected.
#[tokio::test(start_paused = true)]
async fn test_one_failure_fails_everything() {
    let recipe = MockBackend::new(RECIPE);
    let nutrition = MockBackend::new(NUTRITION);
    let meal_plan = MockBackend::new(MEAL_PLAN);
    recipe.expect_get("/recipes/id/7/").return_json(json!({"name": "Stew"}));
    nutrition
        .expect_get("/api/nutrition/7")
        .return_failure(BackendFailure::server_error(500, "nutrition down"));
    meal_plan.expect_get("/mealprep").never_respond();

    let backends: [SharedBackend; 3] = [Arc::new(recipe), Arc::new(nutrition), Arc::new(meal_plan)];
    let mut fan_out = FanOut::new(BUDGET);
    for (backend, call) in backends.iter().zip(calls()) {
        fan_out = fan_out.call(backend.id(), invoke(backend, call));
    }

    let started = tokio::time::Instant::now();
    let err = fan_out.join().await.unwrap_err();

    assert_eq!(err.backend(), NUTRITION);
    assert_eq!(err.kind(), FailureKind::ServerError);
    assert_eq!(err.http_status(), 502);
    assert!(started.elapsed() < BUDGET);
}

/// A retried read that recovers still fits in one fan-out slot.
#[tokio::test(start_paused = true)]
async fn test_retry_inside_fan_out() {
    let recipe = MockBackend::new(RECIPE);
    recipe
        .expect_get("/recipes/id/7/")
        .return_failure(BackendFailure::unreachable("connection reset"));
    recipe.expect_get("/recipes/id/7/").return_json(json!({"name": "Stew"}));

    let backend: SharedBackend = Arc::new(recipe.clone());
    let policy = RetryPolicy::new(1, Duration::from_millis(50));
    let fragments = FanOut::new(BUDGET)
        .call(RECIPE, async move {
            let call = BackendCall::get(RECIPE, "get_recipe", "/recipes/id/7/");
            policy.run(|| backend.invoke(&call, BUDGET)).await
        })
        .join()
        .await
        .unwrap();

    assert_eq!(fragments[&RECIPE]["name"], "Stew");
    assert_eq!(recipe.calls().len(), 2);
    recipe.verify();
}
