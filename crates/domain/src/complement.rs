//! Static category complementarity table

use std::collections::{BTreeSet, HashMap};

/// Default pairings: category -> categories that go well with it
const DEFAULT_PAIRINGS: &[(&str, &[&str])] = &[
    ("Electronics", &["Accessories", "Home"]),
    ("Home", &["Electronics", "Accessories"]),
    ("Sports", &["Health", "Footwear"]),
    ("Health", &["Sports", "Electronics"]),
    ("Beauty", &["Health", "Accessories"]),
    ("Footwear", &["Sports", "Clothing"]),
    ("Clothing", &["Accessories", "Footwear"]),
    ("Accessories", &["Electronics", "Clothing"]),
];

/// Mapping from a category to its complementary categories
#[derive(Debug, Clone)]
pub struct ComplementarityMap {
    pairings: HashMap<&'static str, &'static [&'static str]>,
}

impl Default for ComplementarityMap {
    fn default() -> Self {
        Self::standard()
    }
}

impl ComplementarityMap {
    /// The built-in pairing table
    pub fn standard() -> Self {
        Self {
            pairings: DEFAULT_PAIRINGS.iter().copied().collect(),
        }
    }

    /// Complements of a single category; unknown categories have none
    pub fn complements_of(&self, category: &str) -> &'static [&'static str] {
        self.pairings.get(category).copied().unwrap_or(&[])
    }

    /// Whether `candidate` complements `base`
    pub fn is_complement(&self, base: &str, candidate: &str) -> bool {
        self.complements_of(base).contains(&candidate)
    }

    /// Union of the complements of every category in `categories`
    pub fn expand<'a, I>(&self, categories: I) -> BTreeSet<&'static str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        categories
            .into_iter()
            .flat_map(|c| self.complements_of(c).iter().copied())
            .collect()
    }

    /// All categories named anywhere in the table
    pub fn known_categories(&self) -> BTreeSet<&'static str> {
        self.pairings
            .iter()
            .flat_map(|(k, v)| std::iter::once(*k).chain(v.iter().copied()))
            .collect()
    }

    /// Compare the table against a catalog's categories
    pub fn validate<'a, I>(&self, catalog_categories: I) -> ComplementarityReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let catalog: BTreeSet<String> = catalog_categories
            .into_iter()
            .map(str::to_string)
            .collect();
        let known = self.known_categories();

        let unmapped = catalog
            .iter()
            .filter(|c| !self.pairings.contains_key(c.as_str()))
            .cloned()
            .collect();
        let absent = known
            .into_iter()
            .filter(|c| !catalog.contains(*c))
            .map(str::to_string)
            .collect();

        ComplementarityReport { unmapped, absent }
    }
}

/// Differences between the pairing table and a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplementarityReport {
    /// Catalog categories with no pairing entry
    pub unmapped: Vec<String>,
    /// Table categories that no catalog product uses
    pub absent: Vec<String>,
}

impl ComplementarityReport {
    pub fn is_clean(&self) -> bool {
        self.unmapped.is_empty() && self.absent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complements_of_known_and_unknown() {
        let map = ComplementarityMap::standard();
        assert_eq!(map.complements_of("Electronics"), &["Accessories", "Home"]);
        assert!(map.complements_of("Garden").is_empty());
        assert!(map.is_complement("Sports", "Footwear"));
        assert!(!map.is_complement("Footwear", "Health"));
    }

    #[test]
    fn test_expand_unions_complements() {
        let map = ComplementarityMap::standard();
        let expanded = map.expand(["Electronics", "Sports", "Garden"]);
        let expanded: Vec<_> = expanded.into_iter().collect();
        assert_eq!(expanded, vec!["Accessories", "Footwear", "Health", "Home"]);
    }

    #[test]
    fn test_validate_reports_gaps() {
        let map = ComplementarityMap::standard();
        let report = map.validate(["Electronics", "Garden"]);

        assert_eq!(report.unmapped, vec!["Garden".to_string()]);
        assert!(report.absent.contains(&"Sports".to_string()));
        assert!(!report.absent.contains(&"Electronics".to_string()));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_every_pairing_target_is_a_known_key() {
        let map = ComplementarityMap::standard();
        for category in map.known_categories() {
            assert!(
                !map.complements_of(category).is_empty(),
                "{category} has no pairing entry"
            );
        }
    }
}
