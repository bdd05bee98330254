//! HTTP client for a PostgREST-style shared table.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::{Method, RequestBuilder, Response, Url};
use std::sync::Mutex;

use super::row::decode_rows;
use super::{RecipeRow, RemoteError, RemoteStore};
use crate::config::RemoteConfig;
use crate::models::Recipe;

/// Remote store backed by a PostgREST endpoint (e.g. a Supabase project).
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: Url,
    key: String,
    table: String,
    last_stamp: Mutex<Option<DateTime<Utc>>>,
}

impl HttpRemoteStore {
    /// Creates a new client from config.
    ///
    /// Returns `NotConfigured` if the url or key is missing or blank, and
    /// `InvalidUrl` if the url is not an absolute http(s) URL.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let url = config
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(RemoteError::NotConfigured)?;
        let key = config
            .key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(RemoteError::NotConfigured)?;

        Self::new(url, key, &config.table)
    }

    /// Creates a new client with explicit parameters.
    pub fn new(url: &str, key: &str, table: &str) -> Result<Self, RemoteError> {
        let base_url = Url::parse(url).map_err(|_| RemoteError::InvalidUrl(url.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(url.to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            key: key.to_string(),
            table: table.to_string(),
            last_stamp: Mutex::new(None),
        })
    }

    /// Returns the REST endpoint of the table.
    pub fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.table
        )
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, self.table_url())
            .header("apikey", self.key.as_str())
            .header("Authorization", format!("Bearer {}", self.key))
    }

    /// Returns a timestamp strictly later than any this client handed out.
    fn next_updated_at(&self) -> DateTime<Utc> {
        let mut last = self
            .last_stamp
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = Utc::now();
        let stamp = match *last {
            Some(prev) if now <= prev => prev + Duration::milliseconds(1),
            _ => now,
        };
        *last = Some(stamp);
        stamp
    }
}

async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn fetch_all(&self) -> Result<Vec<Recipe>, RemoteError> {
        tracing::debug!("Fetching recipes from {}", self.table_url());

        let response = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .send()
            .await?;
        let response = check_status(response).await?;

        // Rows are decoded one by one so a single foreign row cannot sink the page
        let rows: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        let mut recipes = decode_rows(rows);
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    async fn upsert_many(&self, recipes: &[Recipe]) -> Result<(), RemoteError> {
        if recipes.is_empty() {
            return Ok(());
        }

        let updated_at = self.next_updated_at();
        let rows: Vec<RecipeRow> = recipes
            .iter()
            .map(|r| RecipeRow::from_recipe(r, updated_at))
            .collect();

        tracing::debug!("Upserting {} recipe(s)", rows.len());

        let response = self
            .request(Method::POST)
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&rows)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete_one(&self, id: &str) -> Result<(), RemoteError> {
        tracing::debug!("Deleting recipe {}", id);

        let response = self
            .request(Method::DELETE)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;

        match check_status(response).await {
            Ok(_) | Err(RemoteError::Status { status: 404, .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: Option<&str>, key: Option<&str>) -> RemoteConfig {
        RemoteConfig {
            url: url.map(String::from),
            key: key.map(String::from),
            ..RemoteConfig::default()
        }
    }

    #[test]
    fn test_from_config_requires_url_and_key() {
        for cfg in [
            config(None, Some("key")),
            config(Some("https://db.example.com"), None),
            config(Some("   "), Some("key")),
            config(Some("https://db.example.com"), Some("")),
        ] {
            assert_eq!(
                HttpRemoteStore::from_config(&cfg).err(),
                Some(RemoteError::NotConfigured)
            );
        }
    }

    #[test]
    fn test_from_config_rejects_malformed_url() {
        for url in ["not a url", "ftp://db.example.com", "mailto:cook@example.com"] {
            let result = HttpRemoteStore::from_config(&config(Some(url), Some("key")));
            assert!(matches!(result, Err(RemoteError::InvalidUrl(_))), "{}", url);
        }
    }

    #[test]
    fn test_table_url() {
        let store = HttpRemoteStore::new("https://abc.supabase.co/", "key", "recipes").unwrap();
        assert_eq!(store.table_url(), "https://abc.supabase.co/rest/v1/recipes");

        let store = HttpRemoteStore::new("http://localhost:3000", "key", "shared_recipes").unwrap();
        assert_eq!(store.table_url(), "http://localhost:3000/rest/v1/shared_recipes");
    }

    #[test]
    fn test_updated_at_is_strictly_increasing() {
        let store = HttpRemoteStore::new("http://localhost:3000", "key", "recipes").unwrap();
        let mut prev = store.next_updated_at();
        for _ in 0..100 {
            let next = store.next_updated_at();
            assert!(next > prev);
            prev = next;
        }
    }
}
