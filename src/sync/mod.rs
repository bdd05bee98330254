//! Coordination between the local store and the remote recipe table.
//!
//! # Usage
//!
//! ```no_run
//! use what2cook::config::Config;
//! use what2cook::store::LocalStore;
//! use what2cook::sync::SyncCoordinator;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(None)?;
//! let local = LocalStore::new(&config.data_dir.value);
//! local.ensure_seed_data();
//!
//! let coordinator = SyncCoordinator::connect(&config, local);
//! coordinator.spawn_hydration();
//! coordinator.wait_ready().await;
//! println!("{} recipes", coordinator.recipes().len());
//! coordinator.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod coordinator;
mod debounce;
mod receipt;
mod state;

pub use coordinator::{SyncCoordinator, SyncOptions};
pub use receipt::{DeleteReceipt, SyncReceipt};
pub use state::{HydrationOutcome, RemoteOutcome, SyncEvent, SyncStatus, HYDRATION_NOTICE};
