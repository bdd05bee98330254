//! What2Cook
//!
//! Local-first recipe catalog. Recipes live on this device and are mirrored
//! to an optional shared table; a pantry of ingredients on hand drives the
//! recipe search.

pub mod catalog;
pub mod config;
pub mod models;
pub mod remote;
pub mod store;
pub mod sync;

pub use config::Config;
pub use models::{Difficulty, Ingredient, Pantry, Recipe, ValidationError};
pub use remote::{HttpRemoteStore, RemoteError, RemoteStore};
#[cfg(any(test, feature = "test-util"))]
pub use remote::MemoryRemoteStore;
pub use store::LocalStore;
pub use sync::{SyncCoordinator, SyncStatus};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
