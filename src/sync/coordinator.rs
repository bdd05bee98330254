//! Keeps the local store and the optional remote table approximately in sync.
//!
//! Lifecycle, in order and never re-entered:
//! 1. Configuration: build the remote adapter, or settle into local mode.
//! 2. Hydration: read the remote once; a non-empty result replaces the local
//!    recipes, an empty one gets the local recipes uploaded, a failure keeps
//!    the local recipes. Readiness flips to true at the end in every case.
//! 3. Steady state: writes land locally at once and are mirrored outward
//!    through the debounce worker; deletes also go out immediately.
//!
//! Remote failures never escape: they are logged, recorded in the status and
//! reported through receipts and events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use super::debounce::{run_worker, PendingPush};
use super::receipt::{DeleteReceipt, SyncReceipt};
use super::state::{HydrationOutcome, RemoteOutcome, SyncEvent, SyncStatus, HYDRATION_NOTICE};
use crate::config::{Config, DEFAULT_DEBOUNCE_MS};
use crate::models::{Pantry, Recipe};
use crate::remote::{HttpRemoteStore, RemoteError, RemoteStore};
use crate::store::LocalStore;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Quiet period before a burst of writes is pushed
    pub debounce: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

#[derive(Default)]
struct MutableState {
    last_error: Option<RemoteError>,
    notice: Option<String>,
    queue: Option<mpsc::UnboundedSender<PendingPush>>,
    worker: Option<JoinHandle<()>>,
}

/// State shared between coordinator handles and the debounce worker.
pub(crate) struct Shared {
    local: LocalStore,
    remote: Option<Arc<dyn RemoteStore>>,
    hydration_started: AtomicBool,
    ready: watch::Sender<bool>,
    events: broadcast::Sender<SyncEvent>,
    state: Mutex<MutableState>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, MutableState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn record_failure(&self, operation: &str, error: &RemoteError) {
        tracing::warn!("Remote {} failed, local data kept: {}", operation, error);
        self.lock().last_error = Some(error.clone());
    }

    pub(crate) fn record_upsert_success(&self, count: usize) {
        tracing::debug!("Pushed {} recipe(s) to remote", count);
        self.lock().last_error = None;
        self.emit(SyncEvent::Upserted { count });
    }

    pub(crate) fn record_upsert_failure(&self, error: RemoteError) {
        self.record_failure("upsert", &error);
        self.emit(SyncEvent::UpsertFailed(error));
    }

    fn mark_ready(&self) {
        let changed = self.ready.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        });
        if changed {
            tracing::info!("Recipe collection ready");
        }
    }
}

/// Flips readiness when hydration ends, including when its future is dropped
/// before finishing.
struct ReadyOnDrop(Arc<Shared>);

impl Drop for ReadyOnDrop {
    fn drop(&mut self) {
        self.0.mark_ready();
    }
}

/// Handle to the sync coordinator. Clones share the same state and worker.
#[derive(Clone)]
pub struct SyncCoordinator {
    shared: Arc<Shared>,
}

impl SyncCoordinator {
    /// Runs the configuration phase: builds the HTTP remote from `config`,
    /// falling back to local mode if it is absent or invalid.
    ///
    /// Must be called inside a Tokio runtime when a remote is configured.
    pub fn connect(config: &Config, local: LocalStore) -> Self {
        let remote: Option<Arc<dyn RemoteStore>> = match HttpRemoteStore::from_config(&config.remote)
        {
            Ok(store) => {
                tracing::info!("Remote sync enabled: {}", store.table_url());
                Some(Arc::new(store))
            }
            Err(RemoteError::NotConfigured) => {
                tracing::info!("No remote configured, running in local mode");
                None
            }
            Err(e) => {
                tracing::warn!("Remote sync disabled: {}", e);
                None
            }
        };

        Self::new(
            local,
            remote,
            SyncOptions {
                debounce: config.debounce(),
            },
        )
    }

    /// Creates a coordinator over `local` and an optional remote.
    ///
    /// Without a remote the coordinator is ready immediately. With one, the
    /// debounce worker is spawned on the current Tokio runtime.
    pub fn new(
        local: LocalStore,
        remote: Option<Arc<dyn RemoteStore>>,
        options: SyncOptions,
    ) -> Self {
        let (ready, _) = watch::channel(false);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let shared = Arc::new(Shared {
            local,
            remote: remote.clone(),
            hydration_started: AtomicBool::new(false),
            ready,
            events,
            state: Mutex::new(MutableState::default()),
        });

        match remote {
            Some(remote) => {
                let (tx, rx) = mpsc::unbounded_channel();
                let worker = tokio::spawn(run_worker(rx, remote, shared.clone(), options.debounce));
                let mut state = shared.lock();
                state.queue = Some(tx);
                state.worker = Some(worker);
            }
            None => shared.mark_ready(),
        }

        Self { shared }
    }

    pub fn local(&self) -> &LocalStore {
        &self.shared.local
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            enabled: self.shared.remote.is_some(),
            ready: self.is_ready(),
            last_error: self.shared.lock().last_error.clone(),
        }
    }

    pub fn is_ready(&self) -> bool {
        *self.shared.ready.borrow()
    }

    /// Returns the hydration failure notice once, then `None`.
    pub fn take_notice(&self) -> Option<String> {
        self.shared.lock().notice.take()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.shared.events.subscribe()
    }

    /// Reads the remote once and reconciles the local recipe collection.
    ///
    /// Never fails; readiness is set when this returns, whatever happened.
    pub async fn hydrate(&self) -> HydrationOutcome {
        let Some(remote) = self.shared.remote.clone() else {
            return HydrationOutcome::LocalOnly;
        };
        if self.shared.hydration_started.swap(true, Ordering::SeqCst) {
            return HydrationOutcome::AlreadyHydrated;
        }
        let ready = ReadyOnDrop(self.shared.clone());

        tracing::info!("Hydrating recipes from remote");

        let outcome = match remote.fetch_all().await {
            Ok(recipes) if !recipes.is_empty() => {
                self.shared.local.set_recipes(&recipes);
                HydrationOutcome::Replaced(recipes.len())
            }
            Ok(_) => {
                let local = self.shared.local.recipes();
                if local.is_empty() {
                    HydrationOutcome::Empty
                } else {
                    tracing::info!(
                        "Remote is empty, uploading {} local recipe(s)",
                        local.len()
                    );
                    let count = local.len();
                    // Outcome is reported through events and status
                    drop(self.schedule_upsert(local));
                    HydrationOutcome::Seeded(count)
                }
            }
            Err(e) => {
                self.shared.record_failure("read", &e);
                self.shared.lock().notice = Some(HYDRATION_NOTICE.to_string());
                HydrationOutcome::Failed(e)
            }
        };

        drop(ready);
        self.shared.emit(SyncEvent::Hydrated(outcome.clone()));
        outcome
    }

    /// Runs [`hydrate`](Self::hydrate) in the background.
    pub fn spawn_hydration(&self) -> JoinHandle<HydrationOutcome> {
        let this = self.clone();
        tokio::spawn(async move { this.hydrate().await })
    }

    /// Waits until hydration has finished.
    pub async fn wait_ready(&self) {
        let mut rx = self.shared.ready.subscribe();
        // The sender lives as long as `self`
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// The locally cached recipes, without waiting for hydration.
    pub fn recipes(&self) -> Vec<Recipe> {
        self.shared.local.recipes()
    }

    /// Looks up a recipe once hydration has finished.
    pub async fn recipe(&self, id: &str) -> Option<Recipe> {
        self.wait_ready().await;
        self.recipes().into_iter().find(|r| r.id == id)
    }

    /// Replaces the recipe collection locally and schedules a remote push.
    ///
    /// Waits for hydration first so remote rows cannot overwrite the write.
    pub async fn set_recipes(&self, recipes: Vec<Recipe>) -> SyncReceipt {
        self.wait_ready().await;
        self.replace_recipes(recipes)
    }

    /// Inserts a recipe, or replaces the one with the same id while keeping
    /// its creation time.
    pub async fn save_recipe(&self, recipe: Recipe) -> SyncReceipt {
        self.wait_ready().await;
        let mut recipes = self.recipes();
        match recipes.iter_mut().find(|r| r.id == recipe.id) {
            Some(existing) => *existing = existing.apply_edit(recipe),
            None => recipes.push(recipe),
        }
        self.replace_recipes(recipes)
    }

    /// Removes a recipe locally, schedules a push of the remainder and
    /// deletes the remote row right away.
    pub async fn delete_recipe(&self, id: &str) -> DeleteReceipt {
        self.wait_ready().await;
        let mut recipes = self.recipes();
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        let removed = recipes.len() != before;

        let upsert = self.replace_recipes(recipes);
        let delete = self.delete_remote(id);

        DeleteReceipt {
            removed,
            upsert,
            delete,
        }
    }

    pub fn pantry(&self) -> Pantry {
        self.shared.local.pantry()
    }

    pub fn set_pantry(&self, pantry: &Pantry) {
        self.shared.local.set_pantry(pantry);
    }

    pub fn add_to_pantry(&self, name: &str) -> bool {
        let mut pantry = self.pantry();
        let changed = pantry.add(name);
        if changed {
            self.set_pantry(&pantry);
        }
        changed
    }

    pub fn remove_from_pantry(&self, name: &str) -> bool {
        let mut pantry = self.pantry();
        let changed = pantry.remove(name);
        if changed {
            self.set_pantry(&pantry);
        }
        changed
    }

    pub fn clear_pantry(&self) {
        let mut pantry = self.pantry();
        pantry.clear();
        self.set_pantry(&pantry);
    }

    /// Stops accepting remote pushes and waits for any pending snapshot to
    /// be sent. Later writes stay local and report `WorkerStopped`.
    pub async fn shutdown(&self) {
        let worker = {
            let mut state = self.shared.lock();
            state.queue = None;
            state.worker.take()
        };
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::warn!("Sync worker ended abnormally: {}", e);
            }
        }
    }

    fn replace_recipes(&self, recipes: Vec<Recipe>) -> SyncReceipt {
        self.shared.local.set_recipes(&recipes);
        self.schedule_upsert(recipes)
    }

    fn schedule_upsert(&self, recipes: Vec<Recipe>) -> SyncReceipt {
        if self.shared.remote.is_none() {
            return SyncReceipt::ready(RemoteOutcome::LocalOnly);
        }

        let (tx, rx) = oneshot::channel();
        let push = PendingPush {
            recipes,
            reply: Some(tx),
        };

        let state = self.shared.lock();
        match state.queue.as_ref().map(|queue| queue.send(push)) {
            Some(Ok(())) => SyncReceipt::pending(rx),
            _ => {
                tracing::warn!("Sync worker stopped, write kept locally only");
                SyncReceipt::ready(RemoteOutcome::Failed(RemoteError::WorkerStopped))
            }
        }
    }

    fn delete_remote(&self, id: &str) -> SyncReceipt {
        let Some(remote) = self.shared.remote.clone() else {
            return SyncReceipt::ready(RemoteOutcome::LocalOnly);
        };

        let (tx, rx) = oneshot::channel();
        let shared = self.shared.clone();
        let id = id.to_string();

        tokio::spawn(async move {
            let outcome = match remote.delete_one(&id).await {
                Ok(()) => {
                    tracing::debug!("Deleted remote recipe {}", id);
                    shared.emit(SyncEvent::Deleted { id });
                    RemoteOutcome::Synced
                }
                Err(e) => {
                    shared.record_failure("delete", &e);
                    shared.emit(SyncEvent::DeleteFailed {
                        id,
                        error: e.clone(),
                    });
                    RemoteOutcome::Failed(e)
                }
            };
            let _ = tx.send(outcome);
        });

        SyncReceipt::pending(rx)
    }
}
