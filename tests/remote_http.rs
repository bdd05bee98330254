//! HTTP adapter against an in-process fake of the PostgREST table API.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use what2cook::models::Ingredient;
use what2cook::store::LocalStore;
use what2cook::sync::{HydrationOutcome, RemoteOutcome, SyncCoordinator, SyncOptions};
use what2cook::{HttpRemoteStore, Recipe, RemoteError, RemoteStore};

const KEY: &str = "anon-key";

#[derive(Default)]
struct Table {
    rows: HashMap<String, Value>,
    /// Status to answer every request with instead of serving it
    fail_with: Option<StatusCode>,
}

type Shared = Arc<Mutex<Table>>;

fn authorized(headers: &HeaderMap) -> bool {
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    apikey == Some(KEY) && bearer == Some("Bearer anon-key")
}

fn check(table: &Table, headers: &HeaderMap) -> Result<(), StatusCode> {
    if !authorized(headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    match table.fail_with {
        Some(status) => Err(status),
        None => Ok(()),
    }
}

async fn select(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<Value>>, StatusCode> {
    let table = state.lock().unwrap();
    check(&table, &headers)?;
    assert_eq!(params.get("select").map(String::as_str), Some("*"));
    Ok(Json(table.rows.values().cloned().collect()))
}

async fn upsert(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(rows): Json<Vec<Value>>,
) -> StatusCode {
    let mut table = state.lock().unwrap();
    if let Err(status) = check(&table, &headers) {
        return status;
    }
    assert_eq!(params.get("on_conflict").map(String::as_str), Some("id"));
    let prefer = headers.get("prefer").and_then(|v| v.to_str().ok()).unwrap_or("");
    assert!(prefer.contains("resolution=merge-duplicates"));

    for row in rows {
        let id = row["id"].as_str().unwrap().to_string();
        table.rows.insert(id, row);
    }
    StatusCode::CREATED
}

async fn delete(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> StatusCode {
    let mut table = state.lock().unwrap();
    if let Err(status) = check(&table, &headers) {
        return status;
    }
    let id = params
        .get("id")
        .and_then(|f| f.strip_prefix("eq."))
        .unwrap()
        .to_string();
    table.rows.remove(&id);
    StatusCode::NO_CONTENT
}

async fn spawn_fake() -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(Table::default()));
    let app = Router::new()
        .route("/rest/v1/recipes", get(select).post(upsert).delete(delete))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), state)
}

fn client(url: &str) -> HttpRemoteStore {
    HttpRemoteStore::new(url, KEY, "recipes").unwrap()
}

fn recipe(id: &str, created_at: i64) -> Recipe {
    Recipe::new(format!("Recipe {}", id))
        .with_id(id)
        .with_created_at(created_at)
        .with_ingredients(vec![Ingredient::new("egg", "2")])
        .with_steps(["Crack the eggs"])
}

#[tokio::test]
async fn test_upsert_then_fetch_newest_first() {
    let (url, state) = spawn_fake().await;
    let remote = client(&url);

    remote
        .upsert_many(&[recipe("old", 1_000), recipe("new", 2_000)])
        .await
        .unwrap();

    let fetched = remote.fetch_all().await.unwrap();
    let ids: Vec<_> = fetched.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["new", "old"]);
    assert_eq!(fetched[0].ingredients, vec![Ingredient::new("egg", "2")]);
    assert_eq!(fetched[0].created_at, 2_000);

    // Wire format uses ISO timestamps
    let table = state.lock().unwrap();
    let row = &table.rows["old"];
    assert_eq!(row["created_at"].as_str(), Some("1970-01-01T00:00:01Z"));
    assert!(row["updated_at"].is_string());
}

#[tokio::test]
async fn test_upsert_replaces_conflicting_row() {
    let (url, _state) = spawn_fake().await;
    let remote = client(&url);

    remote.upsert_many(&[recipe("a", 1_000)]).await.unwrap();
    let renamed = recipe("a", 1_000).with_time(15);
    remote.upsert_many(&[renamed]).await.unwrap();

    let fetched = remote.fetch_all().await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].time, 15);
}

#[tokio::test]
async fn test_empty_upsert_is_a_no_op() {
    // Nothing listens here; an empty batch must not hit the network
    let remote = client("http://127.0.0.1:9");
    assert_eq!(remote.upsert_many(&[]).await, Ok(()));
}

#[tokio::test]
async fn test_delete_missing_row_is_ok() {
    let (url, _state) = spawn_fake().await;
    let remote = client(&url);

    remote.upsert_many(&[recipe("a", 1)]).await.unwrap();
    remote.delete_one("a").await.unwrap();
    remote.delete_one("a").await.unwrap();
    assert!(remote.fetch_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lenient_decoding_of_foreign_rows() {
    let (url, state) = spawn_fake().await;
    state.lock().unwrap().rows.insert(
        "foreign".into(),
        serde_json::json!({
            "id": "foreign",
            "title": null,
            "category": null,
            "time": 12.6,
            "difficulty": "ยาก",
            "ingredients": null,
        }),
    );

    let fetched = client(&url).fetch_all().await.unwrap();
    assert_eq!(fetched.len(), 1);
    let recipe = &fetched[0];
    assert_eq!(recipe.title, "");
    assert_eq!(recipe.category, "other");
    assert_eq!(recipe.time, 13);
    assert_eq!(recipe.difficulty.as_str(), "hard");
    assert!(recipe.ingredients.is_empty());
    assert!(recipe.created_at > 0);
}

#[tokio::test]
async fn test_malformed_row_keeps_the_rest_of_the_page() {
    let (url, state) = spawn_fake().await;
    {
        let mut table = state.lock().unwrap();
        table.rows.insert(
            "odd".into(),
            serde_json::json!({"id": "odd", "ingredients": "egg", "time": "30", "steps": [null]}),
        );
        table
            .rows
            .insert("no-id".into(), serde_json::json!({"title": "orphan"}));
        table.rows.insert(
            "ok".into(),
            serde_json::json!({"id": "ok", "title": "Fine", "created_at": "2024-01-01T00:00:00Z"}),
        );
    }

    let mut fetched = client(&url).fetch_all().await.unwrap();
    fetched.sort_by(|a, b| a.id.cmp(&b.id));
    let ids: Vec<_> = fetched.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["odd", "ok"]);
    assert_eq!(fetched[0].time, 30);
    assert!(fetched[0].ingredients.is_empty());
    assert!(fetched[0].steps.is_empty());
    assert_eq!(fetched[1].title, "Fine");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let (url, state) = spawn_fake().await;
    state.lock().unwrap().fail_with = Some(StatusCode::SERVICE_UNAVAILABLE);
    let remote = client(&url);

    assert!(matches!(
        remote.fetch_all().await,
        Err(RemoteError::Status { status: 503, .. })
    ));
    assert!(matches!(
        remote.upsert_many(&[recipe("a", 1)]).await,
        Err(RemoteError::Status { status: 503, .. })
    ));

    let wrong_key = HttpRemoteStore::new(&url, "wrong", "recipes").unwrap();
    state.lock().unwrap().fail_with = None;
    assert!(matches!(
        wrong_key.fetch_all().await,
        Err(RemoteError::Status { status: 401, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    assert!(matches!(
        client(&url).fetch_all().await,
        Err(RemoteError::Transport(_))
    ));
}

#[tokio::test]
async fn test_coordinator_round_trip_over_http() {
    let (url, state) = spawn_fake().await;
    let temp_dir = TempDir::new().unwrap();
    let local = LocalStore::new(temp_dir.path());
    local.set_recipes(&[recipe("local", 1_000)]);

    let remote: Arc<dyn RemoteStore> = Arc::new(client(&url));
    let coordinator = SyncCoordinator::new(
        local,
        Some(remote),
        SyncOptions {
            debounce: Duration::from_millis(20),
        },
    );

    // Empty remote gets the local recipes
    assert_eq!(coordinator.hydrate().await, HydrationOutcome::Seeded(1));

    let receipt = coordinator.save_recipe(recipe("added", 2_000)).await;
    assert_eq!(receipt.outcome().await, RemoteOutcome::Synced);

    let deleted = coordinator.delete_recipe("local").await;
    assert_eq!(deleted.delete.outcome().await, RemoteOutcome::Synced);
    assert_eq!(deleted.upsert.outcome().await, RemoteOutcome::Synced);
    coordinator.shutdown().await;

    let table = state.lock().unwrap();
    let mut ids: Vec<_> = table.rows.keys().cloned().collect();
    ids.sort();
    assert_eq!(ids, vec!["added"]);
    drop(table);

    // A second device hydrates from the table
    let other_dir = TempDir::new().unwrap();
    let other = SyncCoordinator::new(
        LocalStore::new(other_dir.path()),
        Some(Arc::new(client(&url))),
        SyncOptions::default(),
    );
    assert_eq!(other.hydrate().await, HydrationOutcome::Replaced(1));
    assert_eq!(other.recipe("added").await.map(|r| r.created_at), Some(2_000));
}
