//! # Backend Clients
//!
//! Typed wrappers around the shared adapters. Each client knows the path
//! conventions of one backend service and the record schema its answers
//! must satisfy.

pub mod backend_client;
pub mod meal_plan_client;
pub mod nutrition_client;
pub mod recipe_client;

pub use backend_client::BackendClient;
pub use meal_plan_client::MealPlanClient;
pub use nutrition_client::NutritionClient;
pub use recipe_client::RecipeClient;
