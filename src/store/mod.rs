//! Local-first persistence.
//!
//! Two JSON slots live in the data directory:
//! - `recipes.json`: array of recipes
//! - `pantry.json`: array of ingredient names

mod collection;
mod local;

pub use collection::Collection;
pub use local::LocalStore;
