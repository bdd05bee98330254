//! Row format of the shared `recipes` table.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::DEFAULT_CATEGORY;
use crate::models::lenient;
use crate::models::{Difficulty, Ingredient, Recipe};

/// One recipe as stored remotely. Timestamps are ISO-8601 on the wire.
///
/// Everything but `id` may be null or missing in rows written by other
/// clients; those decode to the same defaults as the local format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeRow {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub time: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub img: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_ingredients")]
    pub ingredients: Option<Vec<Ingredient>>,
    #[serde(default, deserialize_with = "lenient::optional_text_list")]
    pub steps: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Converts a fetched page of rows, skipping rows without a usable id.
pub fn decode_rows(rows: Vec<Value>) -> Vec<Recipe> {
    lenient::decode_each::<RecipeRow>(Value::Array(rows), "remote row")
        .unwrap_or_default()
        .into_iter()
        .filter(|row| !row.id.trim().is_empty())
        .map(RecipeRow::into_recipe)
        .collect()
}

impl RecipeRow {
    /// Builds the row for an upsert, stamping `updated_at`.
    pub fn from_recipe(recipe: &Recipe, updated_at: DateTime<Utc>) -> Self {
        let created_at = Utc
            .timestamp_millis_opt(recipe.created_at)
            .single()
            .filter(|_| recipe.created_at > 0)
            .unwrap_or(updated_at);

        Self {
            id: recipe.id.clone(),
            title: Some(recipe.title.clone()),
            category: Some(recipe.category.clone()),
            time: Some(f64::from(recipe.time)),
            difficulty: Some(recipe.difficulty.to_string()),
            img: Some(recipe.img.clone()),
            ingredients: Some(recipe.ingredients.clone()),
            steps: Some(recipe.steps.clone()),
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        }
    }

    /// Converts a fetched row into the local recipe format.
    pub fn into_recipe(self) -> Recipe {
        let time = self.time.map_or(0, lenient::round_minutes);

        Recipe {
            id: self.id,
            title: self.title.unwrap_or_default(),
            category: self
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            time,
            difficulty: self
                .difficulty
                .map(Difficulty::from)
                .unwrap_or_default(),
            img: self.img.unwrap_or_default(),
            ingredients: self.ingredients.unwrap_or_default(),
            steps: self.steps.unwrap_or_default(),
            created_at: self
                .created_at
                .unwrap_or_else(Utc::now)
                .timestamp_millis(),
        }
    }
}
