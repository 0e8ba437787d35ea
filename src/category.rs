//! Category membership via keyword substring matching.
//!
//! Matching is deliberately blunt (`"life"` matches `"lifetime"`). It sits
//! behind `CategoryMatcher` so the rotation engine never depends on how
//! membership is decided.

use indexmap::IndexMap;

use crate::constants::category::{BUILTIN_KEYWORDS, CATEGORY_ALL};
use crate::data::Quote;
use crate::types::{CategoryId, Keyword};

/// Decides whether a quote belongs to a category.
pub trait CategoryMatcher: Send + Sync {
    /// Pure function of `(quote.text, category)`.
    fn matches(&self, quote: &Quote, category: &str) -> bool;
}

/// Ordered category → keyword table.
#[derive(Clone, Debug)]
pub struct CategoryTable {
    entries: IndexMap<CategoryId, Vec<Keyword>>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategoryTable {
    /// Table containing only `all`.
    pub fn empty() -> Self {
        let mut entries = IndexMap::new();
        entries.insert(CATEGORY_ALL.to_string(), Vec::new());
        Self { entries }
    }

    /// The built-in table (`all`, `life`, `love`, ... `peace`).
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        for (id, keywords) in BUILTIN_KEYWORDS {
            table = table.with_category(*id, keywords.iter().copied());
        }
        table
    }

    /// Add or replace a category. Keywords are lowercased; empty ones are dropped.
    pub fn with_category<K, I>(mut self, id: impl Into<CategoryId>, keywords: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let id = id.into();
        if id == CATEGORY_ALL {
            return self;
        }
        let keywords = keywords
            .into_iter()
            .map(|keyword| keyword.as_ref().trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        self.entries.insert(id, keywords);
        self
    }

    /// Keywords registered for `id`, if any.
    pub fn keywords(&self, id: &str) -> Option<&[Keyword]> {
        self.entries.get(id).map(Vec::as_slice)
    }

    /// Whether `id` is a registered category.
    pub fn is_known(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Registered category ids in display order (`all` first).
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Substring keyword matcher backed by a `CategoryTable`.
#[derive(Clone, Debug, Default)]
pub struct KeywordMatcher {
    table: CategoryTable,
}

impl KeywordMatcher {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }
}

impl CategoryMatcher for KeywordMatcher {
    fn matches(&self, quote: &Quote, category: &str) -> bool {
        if category == CATEGORY_ALL {
            return true;
        }
        let text = quote.text.to_lowercase();
        match self.table.keywords(category) {
            Some(keywords) => keywords.iter().any(|keyword| text.contains(keyword.as_str())),
            // Unknown categories act as their own single keyword.
            None => text.contains(&category.to_lowercase()),
        }
    }
}
