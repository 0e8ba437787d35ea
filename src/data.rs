use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque quote identifier; numeric or string depending on the upstream API.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuoteId {
    /// Numeric identifier (for example dummyjson `id`).
    Numeric(u64),
    /// String identifier (for example quotable `_id`).
    Text(String),
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteId::Numeric(value) => write!(f, "{value}"),
            QuoteId::Text(value) => f.write_str(value),
        }
    }
}

/// A single quote. Immutable once fetched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Stable identifier when the upstream provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QuoteId>,
    /// Quote body.
    #[serde(alias = "quote")]
    pub text: String,
    /// Attributed author.
    pub author: String,
}

impl Quote {
    /// Build a quote carrying a numeric identifier.
    pub fn numbered(id: u64, text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: Some(QuoteId::Numeric(id)),
            text: text.into(),
            author: author.into(),
        }
    }

    /// Build a quote without an identifier (deduplicated by content).
    pub fn anonymous(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            author: author.into(),
        }
    }

    /// Identity used for shown-set deduplication.
    ///
    /// Falls back to structural `(text, author)` equality when the quote has no id.
    pub fn key(&self) -> QuoteKey {
        match &self.id {
            Some(id) => QuoteKey::Id(id.clone()),
            None => QuoteKey::Content {
                text: self.text.clone(),
                author: self.author.clone(),
            },
        }
    }
}

/// Deduplication identity for a quote.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuoteKey {
    /// Identifier-based identity.
    Id(QuoteId),
    /// Structural identity for sources that omit identifiers.
    Content { text: String, author: String },
}

/// Keys of quotes already displayed in the current category cycle.
///
/// Order is display order. Persisted as a plain JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShownSet {
    keys: Vec<QuoteKey>,
}

impl ShownSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_keys(keys: Vec<QuoteKey>) -> Self {
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &QuoteKey) -> bool {
        self.keys.contains(key)
    }

    pub fn push(&mut self, key: QuoteKey) {
        self.keys.push(key);
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn keys(&self) -> &[QuoteKey] {
        &self.keys
    }

    /// Hash view used for bulk membership checks.
    pub(crate) fn lookup(&self) -> HashSet<&QuoteKey> {
        self.keys.iter().collect()
    }
}
