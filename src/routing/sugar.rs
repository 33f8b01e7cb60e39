//! Placeholder sugar: short aliases for common regex fragments.
//!
//! `{id:i}` is shorthand for `{id:\d+}`. The table is plain configuration
//! handed to the parser at construction; merging produces a new table and
//! never touches shared state.

use indexmap::IndexMap;

/// Fragment used when a placeholder has no pattern of its own.
pub const DEFAULT_PATTERN: &str = "[^/]+";

/// Alias → regex fragment table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SugarTable {
    entries: IndexMap<String, String>,
}

impl SugarTable {
    /// A table with no aliases at all.
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Build a table from explicit entries only, discarding the defaults.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::empty().merged(entries)
    }

    /// Return a new table where `overrides` replace existing entries by key.
    pub fn merged<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries = self.entries.clone();
        for (alias, fragment) in overrides {
            entries.insert(alias.into(), fragment.into());
        }
        Self { entries }
    }

    /// Look up the fragment for an alias. Only whole-pattern equality counts.
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    /// Resolve a trimmed placeholder pattern to the regex that is compiled.
    ///
    /// `None` means the placeholder had no `:pattern` part.
    pub fn resolve(&self, pattern: Option<&str>) -> String {
        match pattern {
            Some(p) => match self.get(p) {
                Some(fragment) => fragment.trim().to_string(),
                None => p.to_string(),
            },
            None => self
                .get("")
                .map(|f| f.trim().to_string())
                .unwrap_or_else(|| DEFAULT_PATTERN.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for SugarTable {
    fn default() -> Self {
        Self::from_entries([
            ("i", r"\d+"),
            ("h", "[0-9a-fA-F]+"),
            ("o", "[0-7]"),
            ("a", "[a-zA-Z]+"),
            ("c", "[a-zA-Z_][a-zA-Z0-9_-]*"),
            ("*", DEFAULT_PATTERN),
            ("", DEFAULT_PATTERN),
        ])
    }
}
