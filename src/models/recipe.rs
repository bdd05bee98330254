use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::difficulty::Difficulty;
use super::ingredient::Ingredient;
use super::lenient;
use crate::catalog::{category_label, format_time, DEFAULT_CATEGORY};

/// Rejected user input. Raised by the front end before a recipe is handed
/// to the data layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Recipe title cannot be empty")]
    MissingTitle,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default = "default_category", deserialize_with = "category")]
    pub category: String,
    /// Minutes. Fractional or numeric-string values are rounded on decode.
    #[serde(default, deserialize_with = "lenient::minutes")]
    pub time: u32,
    #[serde(default, deserialize_with = "difficulty")]
    pub difficulty: Difficulty,
    /// URL or bare file name, may be empty
    #[serde(default, deserialize_with = "lenient::text")]
    pub img: String,
    #[serde(default, deserialize_with = "lenient::ingredients")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub steps: Vec<String>,
    /// Epoch milliseconds
    #[serde(rename = "createdAt", default, deserialize_with = "lenient::millis")]
    pub created_at: i64,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn category<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let key = lenient::text(d)?;
    Ok(if key.trim().is_empty() {
        default_category()
    } else {
        key
    })
}

fn difficulty<'de, D: Deserializer<'de>>(d: D) -> Result<Difficulty, D::Error> {
    lenient::text(d).map(Difficulty::from)
}

/// Generates a fresh recipe id (`r_` followed by a simple-format UUID).
pub fn new_recipe_id() -> String {
    format!("r_{}", Uuid::new_v4().simple())
}

impl Recipe {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_recipe_id(),
            title: title.into(),
            category: default_category(),
            time: 0,
            difficulty: Difficulty::default(),
            img: String::new(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            created_at: Utc::now().timestamp_millis(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_time(mut self, minutes: u32) -> Self {
        self.time = minutes;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_image(mut self, img: impl Into<String>) -> Self {
        self.img = img.into();
        self
    }

    /// Sets the ingredient list, dropping rows whose name is blank.
    pub fn with_ingredients(mut self, ingredients: Vec<Ingredient>) -> Self {
        self.ingredients = ingredients
            .into_iter()
            .map(|i| Ingredient::new(i.name.trim(), i.amount.trim()))
            .filter(|i| !i.name.is_empty())
            .collect();
        self
    }

    /// Sets the steps, trimming each and dropping blanks.
    pub fn with_steps<I, S>(mut self, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.steps = steps
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// Splits a multi-line block of text into steps.
    pub fn with_steps_text(self, text: &str) -> Self {
        self.with_steps(text.lines())
    }

    pub fn with_created_at(mut self, millis: i64) -> Self {
        self.created_at = millis;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        Ok(())
    }

    /// Takes every field from `edited` except the identity and the creation
    /// time, which stay those of `self`.
    pub fn apply_edit(&self, edited: Recipe) -> Recipe {
        Recipe {
            id: self.id.clone(),
            created_at: self.created_at,
            ..edited
        }
    }

    /// Case- and whitespace-insensitive ingredient names.
    pub fn ingredient_names(&self) -> impl Iterator<Item = String> + '_ {
        self.ingredients
            .iter()
            .map(|i| crate::catalog::normalize(&i.name))
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(f, "Category: {}", category_label(&self.category))?;
        if let Some(time) = format_time(self.time) {
            writeln!(f, "Time: {}", time)?;
        }
        writeln!(f, "Difficulty: {}", self.difficulty)?;
        if !self.img.is_empty() {
            writeln!(f, "Image: {}", self.img)?;
        }

        writeln!(f, "\nIngredients:")?;
        if self.ingredients.is_empty() {
            writeln!(f, "  —")?;
        }
        for ingredient in &self.ingredients {
            writeln!(f, "  - {}", ingredient)?;
        }

        writeln!(f, "\nSteps:")?;
        if self.steps.is_empty() {
            writeln!(f, "  —")?;
        }
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, step)?;
        }

        Ok(())
    }
}
