//! In-process remote store.
//!
//! Keeps rows in memory and records every call. Stands in for the shared
//! table under test; other crates get it through the `test-util` feature.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{RemoteError, RemoteStore};
use crate::models::Recipe;

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    FetchAll,
    UpsertMany(Vec<Recipe>),
    DeleteOne(String),
}

#[derive(Default)]
struct Inner {
    rows: HashMap<String, Recipe>,
    calls: Vec<RemoteCall>,
    failure: Option<RemoteError>,
}

#[derive(Default)]
pub struct MemoryRemoteStore {
    inner: Mutex<Inner>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Recipe>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            inner.rows = rows.into_iter().map(|r| (r.id.clone(), r)).collect();
        }
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes every following call fail with `error` (`None` heals it).
    pub fn set_failure(&self, error: Option<RemoteError>) {
        self.lock().failure = error;
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.lock().calls.clone()
    }

    pub fn upserts(&self) -> Vec<Vec<Recipe>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RemoteCall::UpsertMany(recipes) => Some(recipes),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RemoteCall::DeleteOne(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lock().rows.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn record(&self, call: RemoteCall) -> Result<std::sync::MutexGuard<'_, Inner>, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(call);
        match inner.failure.clone() {
            Some(error) => Err(error),
            None => Ok(inner),
        }
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn fetch_all(&self) -> Result<Vec<Recipe>, RemoteError> {
        let inner = self.record(RemoteCall::FetchAll)?;
        let mut recipes: Vec<Recipe> = inner.rows.values().cloned().collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    async fn upsert_many(&self, recipes: &[Recipe]) -> Result<(), RemoteError> {
        let mut inner = self.record(RemoteCall::UpsertMany(recipes.to_vec()))?;
        for recipe in recipes {
            inner.rows.insert(recipe.id.clone(), recipe.clone());
        }
        Ok(())
    }

    async fn delete_one(&self, id: &str) -> Result<(), RemoteError> {
        let mut inner = self.record(RemoteCall::DeleteOne(id.to_string()))?;
        inner.rows.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = MemoryRemoteStore::new();
        assert!(store.is_empty());
        assert!(store.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_newest_first() {
        let store = MemoryRemoteStore::with_rows(vec![
            Recipe::new("old").with_created_at(1),
            Recipe::new("new").with_created_at(2),
        ]);

        let titles: Vec<_> = store
            .fetch_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = MemoryRemoteStore::new();
        let recipe = Recipe::new("v1").with_id("r_1");
        store.upsert_many(&[recipe.clone()]).await.unwrap();
        store
            .upsert_many(&[Recipe::new("v2").with_id("r_1")])
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.fetch_all().await.unwrap()[0].title, "v2");
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let store = MemoryRemoteStore::new();
        assert!(store.delete_one("nope").await.is_ok());
        assert_eq!(store.deletes(), vec!["nope".to_string()]);
    }

    #[tokio::test]
    async fn test_failure_injection_records_call() {
        let store = MemoryRemoteStore::new();
        store.set_failure(Some(RemoteError::Transport("down".into())));

        let err = store.upsert_many(&[Recipe::new("x")]).await.unwrap_err();
        assert_eq!(err, RemoteError::Transport("down".into()));
        assert_eq!(store.upserts().len(), 1);
        assert!(store.is_empty());

        store.set_failure(None);
        assert!(store.fetch_all().await.is_ok());
    }
}
