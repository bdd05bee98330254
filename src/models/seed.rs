//! Starter recipes written on first launch so the catalog is never empty.

use chrono::Utc;

use super::{Difficulty, Ingredient, Recipe};

const HOUR_MS: i64 = 60 * 60 * 1000;

pub fn seed_recipes() -> Vec<Recipe> {
    let now = Utc::now().timestamp_millis();

    vec![
        Recipe::new("Basil chicken with rice")
            .with_id("seed_kraprao")
            .with_category("stirfry")
            .with_time(15)
            .with_difficulty(Difficulty::Easy)
            .with_ingredients(vec![
                Ingredient::new("chicken", "200 g"),
                Ingredient::new("holy basil", "1 handful"),
                Ingredient::new("garlic", "5 cloves"),
                Ingredient::new("chili", "3-5"),
                Ingredient::new("oyster sauce", "1 tbsp"),
                Ingredient::new("fish sauce", "1 tsp"),
                Ingredient::new("rice", "1 plate"),
            ])
            .with_steps([
                "Pound the garlic and chili together.",
                "Fry them in hot oil until fragrant.",
                "Add the chicken and stir-fry until cooked.",
                "Season, toss in the basil and serve over rice.",
            ])
            .with_created_at(now - 48 * HOUR_MS),
        Recipe::new("Thai omelette")
            .with_id("seed_omelette")
            .with_category("fried")
            .with_time(10)
            .with_difficulty(Difficulty::Easy)
            .with_ingredients(vec![
                Ingredient::new("egg", "2"),
                Ingredient::new("fish sauce", "1 tsp"),
                Ingredient::new("rice", "1 plate"),
            ])
            .with_steps([
                "Beat the eggs with the fish sauce.",
                "Pour into very hot oil and fry until puffy and golden.",
                "Serve over rice.",
            ])
            .with_created_at(now - 24 * HOUR_MS),
        Recipe::new("Clear soup with minced pork")
            .with_id("seed_tomjued")
            .with_category("tom")
            .with_time(20)
            .with_difficulty(Difficulty::Medium)
            .with_ingredients(vec![
                Ingredient::new("minced pork", "150 g"),
                Ingredient::new("garlic", "3 cloves"),
                Ingredient::new("pepper", "a pinch"),
                Ingredient::new("fish sauce", "1 tbsp"),
            ])
            .with_steps([
                "Season the pork with garlic and pepper and roll into balls.",
                "Bring water to a boil and drop in the pork balls.",
                "Season with fish sauce and simmer until cooked.",
            ])
            .with_created_at(now - 12 * HOUR_MS),
        Recipe::new("Tom yum shrimp")
            .with_id("seed_tomyum")
            .with_category("tom")
            .with_time(25)
            .with_difficulty(Difficulty::Medium)
            .with_ingredients(vec![
                Ingredient::new("shrimp", "300 g"),
                Ingredient::new("lemongrass", "2 stalks"),
                Ingredient::new("galangal", "5 slices"),
                Ingredient::new("kaffir lime leaves", "4"),
                Ingredient::new("lime", "1"),
                Ingredient::new("chili", "to taste"),
                Ingredient::new("fish sauce", "2 tbsp"),
            ])
            .with_steps([
                "Boil lemongrass, galangal and lime leaves.",
                "Add the shrimp and cook until pink.",
                "Season with fish sauce, chili and lime juice off the heat.",
            ])
            .with_created_at(now - 4 * HOUR_MS),
    ]
}
