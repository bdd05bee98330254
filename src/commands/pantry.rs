use clap::{Args, Subcommand};

use super::OutputFormat;
use what2cook::sync::SyncCoordinator;

/// Ingredients on hand. Stored on this device only.
#[derive(Args)]
pub struct PantryCommand {
    #[command(subcommand)]
    pub command: PantrySubcommand,
}

#[derive(Subcommand)]
pub enum PantrySubcommand {
    /// List pantry items
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add an ingredient
    Add {
        /// Ingredient name
        name: String,
    },

    /// Remove an ingredient
    Remove {
        /// Ingredient name (case-insensitive)
        name: String,
    },

    /// Remove every ingredient
    Clear,
}

impl PantryCommand {
    pub fn run(&self, coordinator: &SyncCoordinator) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PantrySubcommand::List { format } => {
                let pantry = coordinator.pantry();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&pantry)?);
                    }
                    OutputFormat::Text => {
                        if pantry.is_empty() {
                            println!("Pantry is empty");
                        } else {
                            for item in pantry.items() {
                                println!("  - {}", item);
                            }
                            println!("\nTotal: {} item(s)", pantry.len());
                        }
                    }
                }
                Ok(())
            }

            PantrySubcommand::Add { name } => {
                if name.trim().is_empty() {
                    return Err("Ingredient name cannot be empty".into());
                }
                if coordinator.add_to_pantry(name) {
                    println!("Added to pantry: {}", name.trim());
                } else {
                    println!("Already in pantry: {}", name.trim());
                }
                Ok(())
            }

            PantrySubcommand::Remove { name } => {
                if coordinator.remove_from_pantry(name) {
                    println!("Removed from pantry: {}", name.trim());
                    Ok(())
                } else {
                    Err(format!("Not in pantry: {}", name.trim()).into())
                }
            }

            PantrySubcommand::Clear => {
                coordinator.clear_pantry();
                println!("Pantry cleared.");
                Ok(())
            }
        }
    }
}
