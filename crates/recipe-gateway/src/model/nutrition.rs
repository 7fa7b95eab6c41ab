use serde::Deserialize;

/// Nutrition facts for one recipe, as the nutrition service returns them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NutritionRecord {
    pub goal: String,
    pub calories: f64,
    pub carbohydrates: f64,
    pub protein: f64,
    pub fiber: f64,
    pub fat: f64,
    pub sugar: f64,
    pub sodium: f64,
    pub ingredient_alternatives: String,
    pub diet_type: String,
}
