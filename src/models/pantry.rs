use serde::{Deserialize, Serialize};

use crate::catalog::normalize;

/// The ingredient names the user says they have on hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pantry {
    items: Vec<String>,
}

impl Pantry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a name unless it is blank or already present (case-insensitive).
    /// Returns whether the pantry changed.
    pub fn add(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.items.push(name.to_string());
        true
    }

    /// Removes every entry equal to `name` after normalization.
    pub fn remove(&mut self, name: &str) -> bool {
        let key = normalize(name);
        let before = self.items.len();
        self.items.retain(|item| normalize(item) != key);
        before != self.items.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        let key = normalize(name);
        self.items.iter().any(|item| normalize(item) == key)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Pantry {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut pantry = Pantry::new();
        for name in iter {
            pantry.add(name.as_ref());
        }
        pantry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_dedupes_case_insensitively() {
        let mut pantry = Pantry::new();
        assert!(pantry.add("Egg"));
        assert!(!pantry.add("  egg "));
        assert!(!pantry.add("EGG"));
        assert!(pantry.add("pork"));
        assert_eq!(pantry.items(), &["Egg".to_string(), "pork".to_string()]);
    }

    #[test]
    fn test_add_ignores_blank() {
        let mut pantry = Pantry::new();
        assert!(!pantry.add("   "));
        assert!(pantry.is_empty());
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let mut pantry: Pantry = ["Garlic", "Chili"].into_iter().collect();
        assert!(pantry.remove("garlic"));
        assert!(!pantry.remove("garlic"));
        assert_eq!(pantry.items(), &["Chili".to_string()]);
    }

    #[test]
    fn test_json_is_plain_array() {
        let pantry: Pantry = ["rice", "Rice", "fish sauce"].into_iter().collect();
        let json = serde_json::to_string(&pantry).unwrap();
        assert_eq!(json, r#"["rice","fish sauce"]"#);

        let parsed: Pantry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pantry);
    }
}
