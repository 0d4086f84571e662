//! Category filtering by stock-code prefix

use serde::{Deserialize, Serialize};

/// Category name that disables filtering
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPrefix {
    pub name: String,
    pub prefix: String,
}

/// Category name → key prefix table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTable {
    entries: Vec<CategoryPrefix>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::from_pairs(&[
            ("Bracelet", "BR"),
            ("Bangle", "BL"),
            ("Chain", "C"),
            ("Earring", "E"),
            ("Ring", "R"),
            ("Pendant", "P"),
            ("Necklace", "N"),
        ])
    }
}

impl CategoryTable {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(name, prefix)| CategoryPrefix {
                    name: name.to_string(),
                    prefix: prefix.to_string(),
                })
                .collect(),
        }
    }

    /// Category names in table order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Prefix for a category (case-insensitive name lookup)
    pub fn prefix(&self, category: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(category.trim()))
            .map(|e| e.prefix.as_str())
    }

    /// Filter for the selected category name
    pub fn filter(&self, category: &str) -> CategoryFilter {
        let category = category.trim();
        if category.is_empty() || category.eq_ignore_ascii_case(ALL_CATEGORIES) {
            return CategoryFilter::All;
        }
        match self.prefix(category) {
            Some(prefix) => CategoryFilter::Prefix {
                category: category.to_string(),
                prefix: prefix.to_string(),
            },
            None => CategoryFilter::Unknown(category.to_string()),
        }
    }
}

/// Predicate over normalized keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Prefix { category: String, prefix: String },
    /// Category missing from the table; matches nothing
    Unknown(String),
}

impl CategoryFilter {
    pub fn accepts(&self, key: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Prefix { prefix, .. } => key.starts_with(prefix.as_str()),
            CategoryFilter::Unknown(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = CategoryTable::default();
        assert_eq!(table.prefix("Ring"), Some("R"));
        assert_eq!(table.prefix("bracelet"), Some("BR"));
        assert_eq!(table.names().count(), 7);
    }

    #[test]
    fn test_all_accepts_everything() {
        let filter = CategoryTable::default().filter("All");
        assert_eq!(filter, CategoryFilter::All);
        assert!(filter.accepts("BR1001"));
        assert!(filter.accepts("X9"));
    }

    #[test]
    fn test_ring_excludes_bracelet() {
        let filter = CategoryTable::default().filter("Ring");
        assert!(filter.accepts("R1001"));
        assert!(!filter.accepts("BR1001"));
    }

    #[test]
    fn test_unknown_category_matches_nothing() {
        let filter = CategoryTable::default().filter("Anklet");
        assert!(matches!(filter, CategoryFilter::Unknown(_)));
        assert!(!filter.accepts("A100"));
        assert!(!filter.accepts(""));
    }

    #[test]
    fn test_blank_category_is_all() {
        assert_eq!(CategoryTable::default().filter("  "), CategoryFilter::All);
    }
}
