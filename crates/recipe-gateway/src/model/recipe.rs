//! Recipe service records and the composite recipe write body.
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

/// Type-safe identifier for recipes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub i64);

impl From<i64> for RecipeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recipe as the recipe service returns it.
///
/// Only used to check that a fragment carries every field the gateway maps;
/// the fragment itself is projected as raw JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipeRecord {
    pub recipe_id: i64,
    pub name: String,
    pub steps: String,
    pub time_to_cook: i64,
    pub meal_type: String,
    pub calories: i64,
    pub rating: f64,
    #[serde(default)]
    pub ingredients: Option<Value>,
}

/// The typed view of a recipe write, used only to validate it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecipeFields {
    pub name: String,
    pub steps: String,
    pub time_to_cook: i64,
    pub meal_type: String,
    pub calories: i64,
    pub rating: f64,
    #[serde(default)]
    pub ingredients: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeWriteError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("time_to_cook must not be negative")]
    NegativeTimeToCook,

    #[error("calories must not be negative")]
    NegativeCalories,
}

/// Body of a recipe create or update.
///
/// The body is checked against [`RecipeFields`] but forwarded exactly as it
/// arrived: unknown fields, `null`s and integer ratings included.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeWrite {
    pub fields: RecipeFields,
    body: Value,
}

impl<'de> Deserialize<'de> for RecipeWrite {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let body = Value::deserialize(deserializer)?;
        let fields = RecipeFields::deserialize(&body).map_err(de::Error::custom)?;
        Ok(Self { fields, body })
    }
}

impl RecipeWrite {
    /// The JSON body forwarded to the recipe service.
    pub fn to_body(&self) -> Value {
        self.body.clone()
    }

    /// Rejects bodies that deserialize but cannot describe a recipe.
    pub fn validate(&self) -> Result<(), RecipeWriteError> {
        if self.fields.name.trim().is_empty() {
            return Err(RecipeWriteError::EmptyName);
        }
        if self.fields.time_to_cook < 0 {
            return Err(RecipeWriteError::NegativeTimeToCook);
        }
        if self.fields.calories < 0 {
            return Err(RecipeWriteError::NegativeCalories);
        }
        Ok(())
    }
}
