//! Remote mirror of the recipe collection.
//!
//! The remote is a shared table with one row per recipe, keyed by id.
//! Every operation may suspend on network I/O; none of them is retried here.

mod error;
mod http;
#[cfg(any(test, feature = "test-util"))]
mod memory;
mod row;

use async_trait::async_trait;

use crate::models::Recipe;

pub use error::RemoteError;
pub use http::HttpRemoteStore;
#[cfg(any(test, feature = "test-util"))]
pub use memory::{MemoryRemoteStore, RemoteCall};
pub use row::RecipeRow;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All recipes, newest first. An empty table is `Ok(vec![])`.
    async fn fetch_all(&self) -> Result<Vec<Recipe>, RemoteError>;

    /// Insert-or-replace keyed by id. A conflicting row is replaced whole.
    async fn upsert_many(&self, recipes: &[Recipe]) -> Result<(), RemoteError>;

    /// Removes a row. A missing row is not an error.
    async fn delete_one(&self, id: &str) -> Result<(), RemoteError>;
}
