//! Named slots in the local store.

/// Collections that can be stored locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Recipes,
    Pantry,
}

impl Collection {
    /// Returns the filename for this collection.
    pub fn filename(&self) -> &'static str {
        match self {
            Collection::Recipes => "recipes.json",
            Collection::Pantry => "pantry.json",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_filename() {
        assert_eq!(Collection::Recipes.filename(), "recipes.json");
        assert_eq!(Collection::Pantry.filename(), "pantry.json");
    }
}
