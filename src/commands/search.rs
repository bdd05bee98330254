//! Ingredient search and the read-only catalog listings.

use clap::Args;

use super::recipe::print_table;
use super::OutputFormat;
use what2cook::catalog::{self, FilterMode, CATEGORIES};
use what2cook::sync::SyncCoordinator;

/// Find recipes by ingredient
#[derive(Args)]
pub struct SearchCommand {
    /// Match any or all of the ingredients
    #[arg(long, short, value_enum, default_value_t = FilterMode::Any)]
    pub mode: FilterMode,

    /// Ingredient to look for (can be repeated); defaults to the pantry
    #[arg(long = "ingredient", short, value_name = "NAME")]
    pub ingredients: Vec<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl SearchCommand {
    pub fn run(&self, coordinator: &SyncCoordinator) -> Result<(), Box<dyn std::error::Error>> {
        let selected: Vec<String> = if self.ingredients.is_empty() {
            coordinator.pantry().items().to_vec()
        } else {
            self.ingredients.clone()
        };

        let recipes = coordinator.recipes();
        let found = catalog::filter_recipes(&recipes, &selected, self.mode);

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&found)?);
            }
            OutputFormat::Text => {
                if !selected.is_empty() {
                    println!("Matching {} of: {}\n", self.mode, selected.join(", "));
                }
                if found.is_empty() {
                    println!("No recipes found");
                } else {
                    print_table(&found);
                }
            }
        }
        Ok(())
    }
}

/// List recipe categories
#[derive(Args)]
pub struct CategoriesCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl CategoriesCommand {
    pub fn run(&self, coordinator: &SyncCoordinator) -> Result<(), Box<dyn std::error::Error>> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&CATEGORIES)?);
            }
            OutputFormat::Text => {
                let recipes = coordinator.recipes();
                println!("{:<10}  {:<12}  {:>7}  DESCRIPTION", "KEY", "LABEL", "RECIPES");
                println!("{}", "-".repeat(70));
                for category in &CATEGORIES {
                    let count = catalog::recipes_in_category(&recipes, Some(category.key)).len();
                    println!(
                        "{:<10}  {:<12}  {:>7}  {}",
                        category.key, category.label, count, category.description
                    );
                }
            }
        }
        Ok(())
    }
}

/// List every known ingredient name
#[derive(Args)]
pub struct IngredientsCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl IngredientsCommand {
    pub fn run(&self, coordinator: &SyncCoordinator) -> Result<(), Box<dyn std::error::Error>> {
        let names = catalog::known_ingredients(&coordinator.recipes());
        let pantry = coordinator.pantry();

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&names)?);
            }
            OutputFormat::Text => {
                for name in &names {
                    let mark = if pantry.contains(name) { "*" } else { " " };
                    println!("{} {}", mark, name);
                }
                println!("\n* in pantry");
            }
        }
        Ok(())
    }
}
