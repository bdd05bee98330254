use clap::{Args, Subcommand};
use std::io::{self, Write};

use super::{report_outcome, OutputFormat};
use what2cook::catalog::{self, category_label, format_time};
use what2cook::models::{Difficulty, Ingredient, Recipe};
use what2cook::sync::SyncCoordinator;

#[derive(Args)]
pub struct RecipeCommand {
    #[command(subcommand)]
    pub command: RecipeSubcommand,
}

/// Recipe fields shared by `add` and `edit`
#[derive(Args, Debug, Default, Clone)]
pub struct RecipeFields {
    /// Category key (tom, fried, stirfry, grill, dessert, other)
    #[arg(long)]
    pub category: Option<String>,

    /// Cooking time in minutes
    #[arg(long)]
    pub time: Option<u32>,

    /// Difficulty (easy, medium, hard)
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Image URL or file name
    #[arg(long)]
    pub image: Option<String>,

    /// Ingredient as NAME or NAME=AMOUNT (can be repeated)
    #[arg(long = "ingredient", value_name = "NAME[=AMOUNT]", value_parser = parse_ingredient)]
    pub ingredients: Vec<Ingredient>,

    /// Cooking step (can be repeated, kept in order)
    #[arg(long = "step", value_name = "TEXT")]
    pub steps: Vec<String>,
}

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// List recipes, newest first
    List {
        /// Only recipes in this category
        #[arg(long)]
        category: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a recipe's details
    Show {
        /// Recipe ID
        id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a new recipe
    Add {
        /// Recipe title
        title: String,

        #[command(flatten)]
        fields: RecipeFields,
    },

    /// Edit an existing recipe
    Edit {
        /// Recipe ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: RecipeFields,
    },

    /// Delete a recipe
    Delete {
        /// Recipe ID
        id: String,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

fn parse_ingredient(s: &str) -> Result<Ingredient, String> {
    Ingredient::parse(s).ok_or_else(|| format!("Invalid ingredient '{}': name is empty", s))
}

impl RecipeFields {
    fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.time.is_none()
            && self.difficulty.is_none()
            && self.image.is_none()
            && self.ingredients.is_empty()
            && self.steps.is_empty()
    }

    /// Applies every field that was given; lists replace the old ones.
    fn apply(&self, mut recipe: Recipe) -> Recipe {
        if let Some(category) = &self.category {
            recipe = recipe.with_category(category.trim());
        }
        if let Some(time) = self.time {
            recipe = recipe.with_time(time);
        }
        if let Some(difficulty) = self.difficulty {
            recipe = recipe.with_difficulty(difficulty);
        }
        if let Some(image) = &self.image {
            recipe = recipe.with_image(image.trim());
        }
        if !self.ingredients.is_empty() {
            recipe = recipe.with_ingredients(self.ingredients.clone());
        }
        if !self.steps.is_empty() {
            recipe = recipe.with_steps(&self.steps);
        }
        recipe
    }
}

/// Builds a new recipe from command-line input.
pub fn build_recipe(title: &str, fields: &RecipeFields) -> Result<Recipe, Box<dyn std::error::Error>> {
    let recipe = fields.apply(Recipe::new(title.trim()));
    recipe.validate()?;
    Ok(recipe)
}

/// Produces the edited version of `existing`, keeping its id and creation time.
pub fn edit_recipe(
    existing: &Recipe,
    title: Option<&str>,
    fields: &RecipeFields,
) -> Result<Recipe, Box<dyn std::error::Error>> {
    if title.is_none() && fields.is_empty() {
        return Err("Nothing to update. Provide at least one option.".into());
    }

    let mut edited = existing.clone();
    if let Some(title) = title {
        edited.title = title.trim().to_string();
    }
    let edited = existing.apply_edit(fields.apply(edited));
    edited.validate()?;
    Ok(edited)
}

impl RecipeCommand {
    pub async fn run(&self, coordinator: &SyncCoordinator) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            RecipeSubcommand::List { category, format } => {
                // Listing never waits for the remote
                let recipes = coordinator.recipes();
                let recipes = catalog::recipes_in_category(&recipes, category.as_deref());

                if recipes.is_empty() {
                    println!("No recipes found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&recipes)?);
                    }
                    OutputFormat::Text => print_table(&recipes),
                }
                Ok(())
            }

            RecipeSubcommand::Show { id, format } => match coordinator.recipe(id).await {
                Some(recipe) => {
                    match format {
                        OutputFormat::Json => {
                            println!("{}", serde_json::to_string_pretty(&recipe)?);
                        }
                        OutputFormat::Text => {
                            println!("{}", recipe);
                        }
                    }
                    Ok(())
                }
                None => Err(format!("Recipe not found: {}", id).into()),
            },

            RecipeSubcommand::Add { title, fields } => {
                let recipe = build_recipe(title, fields)?;
                let receipt = coordinator.save_recipe(recipe.clone()).await;

                println!("Created recipe ({}):", recipe.id);
                println!("{}", recipe);
                report_outcome(receipt.outcome().await);
                Ok(())
            }

            RecipeSubcommand::Edit { id, title, fields } => {
                let existing = coordinator
                    .recipe(id)
                    .await
                    .ok_or_else(|| format!("Recipe not found: {}", id))?;

                let edited = edit_recipe(&existing, title.as_deref(), fields)?;
                let receipt = coordinator.save_recipe(edited.clone()).await;

                println!("Updated recipe:");
                println!("{}", edited);
                report_outcome(receipt.outcome().await);
                Ok(())
            }

            RecipeSubcommand::Delete { id, force } => {
                let title = coordinator.recipe(id).await.map(|r| r.title);

                // Confirm deletion unless --force is used
                if !force {
                    let name = title.as_deref().unwrap_or(id);
                    print!("Delete recipe '{}'? [y/N] ", name);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                let receipt = coordinator.delete_recipe(id).await;
                match title {
                    Some(title) if receipt.removed => println!("Deleted recipe: {}", title),
                    _ => println!("Recipe {} was not stored locally", id),
                }
                report_outcome(receipt.delete.outcome().await);
                report_outcome(receipt.upsert.outcome().await);
                Ok(())
            }
        }
    }
}

pub(crate) fn print_table(recipes: &[&Recipe]) {
    println!(
        "{:<36}  {:<30}  {:<10}  {:>7}  DIFFICULTY",
        "ID", "TITLE", "CATEGORY", "TIME"
    );
    println!("{}", "-".repeat(100));
    for recipe in recipes {
        println!(
            "{:<36}  {:<30}  {:<10}  {:>7}  {}",
            recipe.id,
            truncate(&recipe.title, 30),
            category_label(&recipe.category),
            format_time(recipe.time).unwrap_or_default(),
            recipe.difficulty
        );
    }
    println!("\nTotal: {} recipe(s)", recipes.len());
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use what2cook::models::ValidationError;

    fn fields() -> RecipeFields {
        RecipeFields {
            category: Some("stirfry".into()),
            time: Some(10),
            difficulty: Some(Difficulty::Medium),
            image: None,
            ingredients: vec![Ingredient::new("minced pork", "200 g"), Ingredient::new("  ", "1")],
            steps: vec!["Heat the oil".into(), "  ".into(), "Add pork".into()],
        }
    }

    #[test]
    fn test_parse_ingredient_arg() {
        assert_eq!(
            parse_ingredient("holy basil = 1 handful").unwrap(),
            Ingredient::new("holy basil", "1 handful")
        );
        assert_eq!(parse_ingredient("egg").unwrap(), Ingredient::new("egg", ""));
        assert!(parse_ingredient(" =2").is_err());
    }

    #[test]
    fn test_build_recipe() {
        let recipe = build_recipe("  Pad kraprao ", &fields()).unwrap();
        assert_eq!(recipe.title, "Pad kraprao");
        assert_eq!(recipe.category, "stirfry");
        assert_eq!(recipe.time, 10);
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.ingredients.len(), 1);
        assert_eq!(recipe.steps, vec!["Heat the oil", "Add pork"]);
    }

    #[test]
    fn test_build_recipe_rejects_blank_title() {
        let err = build_recipe("   ", &RecipeFields::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::MissingTitle)
        );
    }

    #[test]
    fn test_edit_keeps_identity() {
        let existing = Recipe::new("Omelette")
            .with_id("r_1")
            .with_created_at(42)
            .with_steps(["Beat eggs"]);

        let edited = edit_recipe(&existing, Some("Fluffy omelette"), &RecipeFields::default()).unwrap();
        assert_eq!(edited.id, "r_1");
        assert_eq!(edited.created_at, 42);
        assert_eq!(edited.title, "Fluffy omelette");
        // Untouched fields survive
        assert_eq!(edited.steps, vec!["Beat eggs"]);
    }

    #[test]
    fn test_edit_requires_changes() {
        let existing = Recipe::new("Omelette");
        assert!(edit_recipe(&existing, None, &RecipeFields::default()).is_err());
        assert!(edit_recipe(&existing, Some(" "), &RecipeFields::default()).is_err());
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ต้มยำกุ้งน้ำข้น", 6), "ต้ม...");
    }
}
