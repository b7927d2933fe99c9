//! Blog registry - route to entry lookup

use std::collections::HashMap;

use super::BlogEntry;
use crate::router::Route;

/// Immutable map from canonical routes to blog entries.
///
/// Built once from configuration at startup. Because every route is
/// normalized on the way in, lookup is a single exact match; the registry
/// never needs to retry with slash variants.
pub struct BlogRegistry {
    entries: Vec<BlogEntry>,
    by_route: HashMap<Route, usize>,
}

impl BlogRegistry {
    /// Build a registry from the configured entries.
    ///
    /// `url` uniqueness is not enforced by configuration; duplicates keep
    /// the first entry and log a warning.
    pub fn new(entries: &[BlogEntry]) -> Self {
        let entries: Vec<BlogEntry> = entries.to_vec();
        let mut by_route: HashMap<Route, usize> = HashMap::with_capacity(entries.len());

        for (idx, entry) in entries.iter().enumerate() {
            let route = Route::new(&entry.url);
            if let Some(&existing) = by_route.get(&route) {
                tracing::warn!(
                    "duplicate blog url {}: keeping {:?}, ignoring {:?}",
                    route,
                    entries[existing].title,
                    entry.title
                );
                continue;
            }
            by_route.insert(route, idx);
        }

        Self { entries, by_route }
    }

    /// Look up the entry for a route.
    pub fn lookup(&self, route: &Route) -> Option<&BlogEntry> {
        self.by_route.get(route).map(|&idx| &self.entries[idx])
    }

    /// All registered entries, in configuration order.
    pub fn entries(&self) -> &[BlogEntry] {
        &self.entries
    }

    /// All registered routes, in configuration order.
    pub fn routes(&self) -> impl Iterator<Item = Route> + '_ {
        self.entries.iter().map(|e| Route::new(&e.url))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(title: &str, url: &str, path: &str) -> BlogEntry {
        BlogEntry {
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 9, 11).unwrap(),
            url: url.to_string(),
            path: path.to_string(),
            alternates: Vec::new(),
        }
    }

    #[test]
    fn test_lookup_is_normalization_insensitive() {
        let registry = BlogRegistry::new(&[entry(
            "Solving the Halting Problem",
            "/blog/halting-problem",
            "blogs/halting-problem.md",
        )]);

        for candidate in ["/blog/halting-problem", "blog/halting-problem", "/blog/halting-problem/"] {
            let found = registry.lookup(&Route::new(candidate));
            assert!(found.is_some(), "should resolve {}", candidate);
            assert_eq!(found.unwrap().path, "blogs/halting-problem.md");
        }
    }

    #[test]
    fn test_lookup_miss() {
        let registry = BlogRegistry::new(&[entry("A", "/blog/a", "blogs/a.md")]);
        assert!(registry.lookup(&Route::new("/blog/unknown")).is_none());
    }

    #[test]
    fn test_duplicate_url_keeps_first() {
        let registry = BlogRegistry::new(&[
            entry("First", "/blog/dup", "blogs/first.md"),
            entry("Second", "blog/dup", "blogs/second.md"),
        ]);
        assert_eq!(registry.len(), 2);
        let found = registry.lookup(&Route::new("/blog/dup")).unwrap();
        assert_eq!(found.title, "First");
    }
}
