mod difficulty;
mod ingredient;
pub(crate) mod lenient;
mod pantry;
mod recipe;
mod seed;

pub use difficulty::Difficulty;
pub use ingredient::Ingredient;
pub use pantry::Pantry;
pub use recipe::{new_recipe_id, Recipe, ValidationError};
pub use seed::seed_recipes;
