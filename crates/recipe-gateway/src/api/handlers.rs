use crate::api::error::ApiError;
use crate::lifecycle::GatewaySystem;
use crate::model::{CompositeRequest, RecipeId, RecipeWrite, WriteOperation, WriteRequest};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use fanout_framework::CompositeResponse;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

type SharedSystem = State<Arc<GatewaySystem>>;

#[derive(Debug, Deserialize)]
pub struct MealPlanQuery {
    pub date: Option<NaiveDate>,
}

fn recipe_id(path: Result<Path<RecipeId>, PathRejection>) -> Result<RecipeId, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))
}

fn recipe_body(body: Result<Json<RecipeWrite>, JsonRejection>) -> Result<RecipeWrite, ApiError> {
    let Json(recipe) = body.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;
    recipe.validate()?;
    Ok(recipe)
}

pub async fn recipe_with_nutrition(
    State(system): SharedSystem,
    path: Result<Path<RecipeId>, PathRejection>,
    query: Result<Query<MealPlanQuery>, QueryRejection>,
) -> Result<Json<CompositeResponse>, ApiError> {
    let id = recipe_id(path)?;
    let Query(query) = query.map_err(|rejection| ApiError::InvalidRequest(rejection.body_text()))?;
    let response = system
        .aggregator
        .aggregate(CompositeRequest::recipe_with_nutrition(id, query.date))
        .await?;
    Ok(Json(response))
}

pub async fn recipe_detail(
    State(system): SharedSystem,
    path: Result<Path<RecipeId>, PathRejection>,
) -> Result<Json<CompositeResponse>, ApiError> {
    let id = recipe_id(path)?;
    let response = system
        .aggregator
        .aggregate(CompositeRequest::recipe_detail(id))
        .await?;
    Ok(Json(response))
}

pub async fn create_recipe(
    State(system): SharedSystem,
    body: Result<Json<RecipeWrite>, JsonRejection>,
) -> Result<(StatusCode, Json<CompositeResponse>), ApiError> {
    let payload = recipe_body(body)?;
    let response = system
        .writes
        .forward(WriteRequest {
            operation: WriteOperation::Create,
            payload,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn update_recipe(
    State(system): SharedSystem,
    path: Result<Path<RecipeId>, PathRejection>,
    body: Result<Json<RecipeWrite>, JsonRejection>,
) -> Result<Json<CompositeResponse>, ApiError> {
    let recipe_id = recipe_id(path)?;
    let payload = recipe_body(body)?;
    let response = system
        .writes
        .forward(WriteRequest {
            operation: WriteOperation::Update { recipe_id },
            payload,
        })
        .await?;
    Ok(Json(response))
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
