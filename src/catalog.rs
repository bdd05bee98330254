//! Read-only queries over an in-memory recipe list.
//!
//! Everything here is synchronous and infallible; the front end calls these
//! on whatever list the sync coordinator hands it.

use clap::ValueEnum;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::models::Recipe;

/// Key used for recipes without a recognised category.
pub const DEFAULT_CATEGORY: &str = "other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const CATEGORIES: [Category; 6] = [
    Category {
        key: "tom",
        label: "Soups",
        description: "Clear soups, boiled and tom yum dishes",
    },
    Category {
        key: "fried",
        label: "Fried",
        description: "Deep-fried dishes and omelettes",
    },
    Category {
        key: "stirfry",
        label: "Stir-fried",
        description: "Wok dishes",
    },
    Category {
        key: "grill",
        label: "Grilled",
        description: "Grilled, roasted and baked dishes",
    },
    Category {
        key: "dessert",
        label: "Desserts",
        description: "Sweets and snacks",
    },
    Category {
        key: DEFAULT_CATEGORY,
        label: "Other",
        description: "Everything else",
    },
];

/// Ingredients suggested before any recipe mentions them.
pub const COMMON_INGREDIENTS: [&str; 21] = [
    "egg",
    "chicken",
    "minced pork",
    "pork belly",
    "shrimp",
    "fish",
    "rice",
    "chili",
    "garlic",
    "shallot",
    "onion",
    "holy basil",
    "fish sauce",
    "sugar",
    "oyster sauce",
    "light soy sauce",
    "pepper",
    "lime",
    "lemongrass",
    "galangal",
    "kaffir lime leaves",
];

pub fn find_category(key: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.key == key)
}

/// Display label for a category key, or the key itself when unknown.
pub fn category_label(key: &str) -> &str {
    find_category(key).map(|c| c.label).unwrap_or(key)
}

/// Trimmed, lowercased form used for every ingredient comparison.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FilterMode {
    /// At least one selected ingredient
    #[default]
    Any,
    /// Every selected ingredient
    All,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::Any => write!(f, "any"),
            FilterMode::All => write!(f, "all"),
        }
    }
}

/// Filters recipes by ingredient membership.
///
/// Names are compared after [`normalize`]. An empty (or all-blank)
/// selection returns every recipe in the original order.
pub fn filter_recipes<'a, S: AsRef<str>>(
    recipes: &'a [Recipe],
    selected: &[S],
    mode: FilterMode,
) -> Vec<&'a Recipe> {
    let wanted: Vec<String> = selected
        .iter()
        .map(|s| normalize(s.as_ref()))
        .filter(|s| !s.is_empty())
        .collect();

    if wanted.is_empty() {
        return recipes.iter().collect();
    }

    recipes
        .iter()
        .filter(|recipe| {
            let names: HashSet<String> = recipe.ingredient_names().collect();
            match mode {
                FilterMode::All => wanted.iter().all(|w| names.contains(w)),
                FilterMode::Any => wanted.iter().any(|w| names.contains(w)),
            }
        })
        .collect()
}

/// Recipes in `category` (all of them for `None`), newest first.
pub fn recipes_in_category<'a>(recipes: &'a [Recipe], category: Option<&str>) -> Vec<&'a Recipe> {
    let mut found: Vec<&Recipe> = recipes
        .iter()
        .filter(|r| category.map_or(true, |c| r.category == c))
        .collect();
    found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    found
}

/// Common ingredients first, then every other name used by a recipe.
pub fn known_ingredients(recipes: &[Recipe]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    let from_recipes = recipes
        .iter()
        .flat_map(|r| r.ingredients.iter().map(|i| i.name.as_str()));

    for name in COMMON_INGREDIENTS.iter().copied().chain(from_recipes) {
        let name = name.trim();
        if !name.is_empty() && seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }
    names
}

pub fn format_time(minutes: u32) -> Option<String> {
    (minutes > 0).then(|| format!("{} min", minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ingredient;

    fn recipe(id: &str, ingredients: &[&str]) -> Recipe {
        Recipe::new(id)
            .with_id(id)
            .with_ingredients(ingredients.iter().map(|n| Ingredient::new(*n, "")).collect())
    }

    fn ids(recipes: &[&Recipe]) -> Vec<String> {
        recipes.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_category_label() {
        assert_eq!(category_label("stirfry"), "Stir-fried");
        assert_eq!(category_label("other"), "Other");
        assert_eq!(category_label("brunch"), "brunch");
        assert_eq!(category_label(""), "");
    }

    #[test]
    fn test_filter_all_and_any() {
        let recipes = vec![recipe("a", &["egg", "pork"]), recipe("b", &["egg"])];
        let selection = ["egg", "pork"];

        let all = filter_recipes(&recipes, &selection, FilterMode::All);
        assert_eq!(ids(&all), vec!["a"]);

        let any = filter_recipes(&recipes, &selection, FilterMode::Any);
        assert_eq!(ids(&any), vec!["a", "b"]);
    }

    #[test]
    fn test_filter_normalizes_names() {
        let recipes = vec![recipe("a", &["  Fish Sauce "])];
        let found = filter_recipes(&recipes, &["fish sauce"], FilterMode::All);
        assert_eq!(ids(&found), vec!["a"]);
    }

    #[test]
    fn test_filter_is_exact_not_substring() {
        let recipes = vec![recipe("a", &["pork belly"])];
        assert!(filter_recipes(&recipes, &["pork"], FilterMode::Any).is_empty());
    }

    #[test]
    fn test_empty_selection_is_identity() {
        let recipes = vec![recipe("a", &["egg"]), recipe("b", &[])];
        let none: [&str; 0] = [];
        assert_eq!(ids(&filter_recipes(&recipes, &none, FilterMode::All)), vec!["a", "b"]);
        assert_eq!(ids(&filter_recipes(&recipes, &["  "], FilterMode::Any)), vec!["a", "b"]);
    }

    #[test]
    fn test_recipes_in_category_newest_first() {
        let recipes = vec![
            recipe("old", &[]).with_category("tom").with_created_at(1),
            recipe("new", &[]).with_category("tom").with_created_at(3),
            recipe("fried", &[]).with_category("fried").with_created_at(2),
        ];

        assert_eq!(ids(&recipes_in_category(&recipes, Some("tom"))), vec!["new", "old"]);
        assert_eq!(
            ids(&recipes_in_category(&recipes, None)),
            vec!["new", "fried", "old"]
        );
        assert!(recipes_in_category(&recipes, Some("dessert")).is_empty());
    }

    #[test]
    fn test_known_ingredients_common_first() {
        let recipes = vec![recipe("a", &["egg", " tofu ", ""]), recipe("b", &["tofu"])];
        let names = known_ingredients(&recipes);

        assert_eq!(names[0], "egg");
        assert_eq!(names.len(), COMMON_INGREDIENTS.len() + 1);
        assert_eq!(names.last().unwrap(), "tofu");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), None);
        assert_eq!(format_time(15), Some("15 min".to_string()));
    }
}
