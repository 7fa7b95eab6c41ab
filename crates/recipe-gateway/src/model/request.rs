//! Inbound requests, already parsed and validated by the API layer.
use super::recipe::{RecipeId, RecipeWrite};
use super::{MEAL_PLAN, NUTRITION, RECIPE};
use chrono::NaiveDate;
use fanout_framework::BackendId;

/// The read operations the gateway composes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeOperation {
    /// Recipe, nutrition facts and the linked meal plan. `None` uses the
    /// configured meal-plan day.
    RecipeWithNutrition { meal_plan_date: Option<NaiveDate> },
    /// The recipe alone.
    RecipeDetail,
}

impl CompositeOperation {
    pub fn name(&self) -> &'static str {
        match self {
            CompositeOperation::RecipeWithNutrition { .. } => "recipe_with_nutrition",
            CompositeOperation::RecipeDetail => "recipe_detail",
        }
    }

    /// Backends every request of this operation calls, exactly once each.
    pub fn required_backends(&self) -> &'static [BackendId] {
        match self {
            CompositeOperation::RecipeWithNutrition { .. } => &[RECIPE, NUTRITION, MEAL_PLAN],
            CompositeOperation::RecipeDetail => &[RECIPE],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeRequest {
    pub recipe_id: RecipeId,
    pub operation: CompositeOperation,
}

impl CompositeRequest {
    pub fn recipe_with_nutrition(recipe_id: impl Into<RecipeId>, meal_plan_date: Option<NaiveDate>) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            operation: CompositeOperation::RecipeWithNutrition { meal_plan_date },
        }
    }

    pub fn recipe_detail(recipe_id: impl Into<RecipeId>) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            operation: CompositeOperation::RecipeDetail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    Create,
    Update { recipe_id: RecipeId },
}

impl WriteOperation {
    pub fn name(&self) -> &'static str {
        match self {
            WriteOperation::Create => "create_recipe",
            WriteOperation::Update { .. } => "update_recipe",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteRequest {
    pub operation: WriteOperation,
    pub payload: RecipeWrite,
}
