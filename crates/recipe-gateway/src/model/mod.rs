//! # Domain Model
//!
//! Backend record schemas, the inbound request types and the identifiers
//! of the three backend services the gateway composes.

pub mod meal_plan;
pub mod nutrition;
pub mod recipe;
pub mod request;

pub use meal_plan::{MealPlanEntry, MealPlanListing};
pub use nutrition::NutritionRecord;
pub use recipe::{RecipeFields, RecipeId, RecipeRecord, RecipeWrite, RecipeWriteError};
pub use request::{CompositeOperation, CompositeRequest, WriteOperation, WriteRequest};

use fanout_framework::BackendId;

/// The recipe service. Authoritative for recipe writes.
pub const RECIPE: BackendId = BackendId::new("recipe");
pub const NUTRITION: BackendId = BackendId::new("nutrition");
pub const MEAL_PLAN: BackendId = BackendId::new("meal_plan");
