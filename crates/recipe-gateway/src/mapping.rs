//! # Composite Schemas
//!
//! The projection table of every composite operation. Tables are plain data
//! built from [`FieldMapping`] rows, so each one can be tested without a
//! network.
//!
//! | target               | source                           | coercion |
//! |----------------------|----------------------------------|----------|
//! | `calories_recipe`    | recipe `calories`                | integer  |
//! | `calories_nutrition` | nutrition `calories`             | number   |
//! | `week_plan_id`       | meal plan `[0][0].week_plan_id`  | integer  |
//! | `weeks`, `food`      | meal plan `[0][0]`               | describe |
//!
//! Every other field keeps its backend name.

use crate::model::{CompositeOperation, MEAL_PLAN, NUTRITION, RECIPE};
use fanout_framework::{Coercion, FieldMapping, FieldPath, Projection};

/// Recipe identity and content fields shared by the read schemas.
fn recipe_fields(projection: Projection) -> Projection {
    projection
        .field(FieldMapping::new("recipe_id", RECIPE, "recipe_id").coerce(Coercion::Integer))
        .field(FieldMapping::new("name", RECIPE, "name").coerce(Coercion::Text))
        .field(FieldMapping::new("steps", RECIPE, "steps").coerce(Coercion::Text))
        .field(FieldMapping::new("time_to_cook", RECIPE, "time_to_cook").coerce(Coercion::Integer))
        .field(FieldMapping::new("meal_type", RECIPE, "meal_type").coerce(Coercion::Text))
        .field(FieldMapping::new("calories_recipe", RECIPE, "calories").coerce(Coercion::Integer))
        .field(FieldMapping::new("rating", RECIPE, "rating").coerce(Coercion::Number))
}

/// Recipe, nutrition macros and meal-plan linkage.
pub fn recipe_with_nutrition() -> Projection {
    let linked = FieldPath::root().index(0).index(0);
    let nutrition = |target: &'static str| {
        FieldMapping::new(target, NUTRITION, target).coerce(Coercion::Number)
    };

    recipe_fields(Projection::new("recipe_with_nutrition"))
        .field(FieldMapping::new("goal", NUTRITION, "goal").coerce(Coercion::Text))
        .field(FieldMapping::new("calories_nutrition", NUTRITION, "calories").coerce(Coercion::Number))
        .field(nutrition("carbohydrates"))
        .field(nutrition("protein"))
        .field(nutrition("fiber"))
        .field(nutrition("fat"))
        .field(nutrition("sugar"))
        .field(nutrition("sodium"))
        .field(
            FieldMapping::new("ingredient_alternatives", NUTRITION, "ingredient_alternatives")
                .coerce(Coercion::Text),
        )
        .field(FieldMapping::new("diet_type", NUTRITION, "diet_type").coerce(Coercion::Text))
        .field(
            FieldMapping::new("week_plan_id", MEAL_PLAN, linked.clone().key("week_plan_id"))
                .coerce(Coercion::Integer),
        )
        .field(FieldMapping::new("weeks", MEAL_PLAN, linked.clone()).coerce(Coercion::Describe))
        .field(FieldMapping::new("food", MEAL_PLAN, linked).coerce(Coercion::Describe))
}

/// The recipe alone.
pub fn recipe_detail() -> Projection {
    recipe_fields(Projection::new("recipe_detail"))
}

/// A recipe service write answer, relayed under the composite recipe schema.
///
/// The write schema uses the backend's own names, so every field passes
/// through unchanged. The table requires the recipe fields; everything else
/// the backend answered, `ingredients` included, follows them as-is.
pub fn recipe_write() -> Projection {
    [
        "recipe_id",
        "name",
        "steps",
        "time_to_cook",
        "meal_type",
        "calories",
        "rating",
    ]
    .into_iter()
    .fold(Projection::new("recipe_write"), |projection, field| {
        projection.field(FieldMapping::new(field, RECIPE, field))
    })
    .carry_rest_of(RECIPE)
}

pub fn for_operation(operation: &CompositeOperation) -> Projection {
    match operation {
        CompositeOperation::RecipeWithNutrition { .. } => recipe_with_nutrition(),
        CompositeOperation::RecipeDetail => recipe_detail(),
    }
}
