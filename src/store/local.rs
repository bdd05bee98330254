//! JSON slot storage on the local filesystem.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::Collection;
use crate::models::lenient;
use crate::models::{seed_recipes, Pantry, Recipe};

/// Durable key-value storage for the recipe and pantry collections.
///
/// Reads never fail: a missing or undecodable slot yields the caller's
/// fallback. Writes never fail either: errors are logged and the previous
/// slot contents stay in place.
#[derive(Clone, Debug)]
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the full path for a collection.
    pub fn path(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.filename())
    }

    /// Checks if a collection has ever been written.
    pub fn exists(&self, collection: Collection) -> bool {
        self.path(collection).exists()
    }

    /// Reads a collection, returning `fallback` if it is absent or corrupt.
    pub fn read<T: DeserializeOwned>(&self, collection: Collection, fallback: T) -> T {
        let path = self.path(collection);

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return fallback,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                return fallback;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring undecodable {}: {}", path.display(), e);
                fallback
            }
        }
    }

    /// Persists a collection. Failures are logged and swallowed.
    pub fn write<T: Serialize + ?Sized>(&self, collection: Collection, value: &T) {
        if let Err(e) = self.try_write(collection, value) {
            tracing::warn!(
                "Failed to write {}: {}",
                self.path(collection).display(),
                e
            );
        }
    }

    fn try_write<T: Serialize + ?Sized>(&self, collection: Collection, value: &T) -> io::Result<()> {
        let bytes = serde_json::to_vec(value).map_err(io::Error::other)?;

        fs::create_dir_all(&self.data_dir)?;

        let path = self.path(collection);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)
    }

    /// Stored recipes. Records that cannot be decoded are skipped one by one
    /// rather than discarding the whole collection.
    pub fn recipes(&self) -> Vec<Recipe> {
        let stored: Value = self.read(Collection::Recipes, Value::Null);
        lenient::decode_each(stored, "local recipe").unwrap_or_default()
    }

    pub fn set_recipes(&self, recipes: &[Recipe]) {
        self.write(Collection::Recipes, recipes);
    }

    pub fn pantry(&self) -> Pantry {
        self.read(Collection::Pantry, Pantry::new())
    }

    pub fn set_pantry(&self, pantry: &Pantry) {
        self.write(Collection::Pantry, pantry);
    }

    /// Writes the starter recipes (and an empty pantry) when the recipe slot
    /// is absent or holds an empty list. A slot with content that fails to
    /// decode is left alone. Returns whether anything was seeded.
    pub fn ensure_seed_data(&self) -> bool {
        if self.exists(Collection::Recipes) {
            let stored: Value = self.read(Collection::Recipes, Value::Null);
            if !matches!(&stored, Value::Array(items) if items.is_empty()) {
                return false;
            }
        }
        tracing::info!("No local recipes found, writing starter recipes");
        self.set_recipes(&seed_recipes());
        self.set_pantry(&Pantry::new());
        true
    }
}
