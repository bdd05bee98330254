mod config_cmd;
mod pantry;
mod recipe;
mod search;
mod status;

use clap::ValueEnum;

use what2cook::sync::RemoteOutcome;

pub use config_cmd::ConfigCommand;
pub use pantry::PantryCommand;
pub use recipe::RecipeCommand;
pub use search::{CategoriesCommand, IngredientsCommand, SearchCommand};
pub use status::StatusCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Tells the user when a local write did not reach the remote.
fn report_outcome(outcome: RemoteOutcome) {
    if let RemoteOutcome::Failed(e) = outcome {
        eprintln!("Saved on this device, but remote sync failed: {}", e);
    }
}
