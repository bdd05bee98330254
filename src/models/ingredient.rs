use serde::{Deserialize, Serialize};
use std::fmt;

use super::lenient;

/// One ingredient line of a recipe. Both fields are free text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Ingredient {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub amount: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
        }
    }

    /// Parses `name=amount` (or a bare `name`) as typed on the command line.
    pub fn parse(input: &str) -> Option<Self> {
        let (name, amount) = match input.split_once('=') {
            Some((name, amount)) => (name, amount),
            None => (input, ""),
        };
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, amount.trim()))
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.amount.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} — {}", self.name, self.amount)
        }
    }
}
