#![doc = include_str!("../README.md")]

/// Command-line runner shared by the `quote_galaxy` binary.
pub mod apps;
/// Category tables and quote matching.
pub mod category;
/// Engine, source, store, and translation configuration types.
pub mod config;
/// Centralized constants used across rotation, sources, and stores.
pub mod constants;
/// Quote records, identities, and shown-sets.
pub mod data;
mod hash;
/// Display languages and localized status strings.
pub mod locale;
/// Category-filtered, no-repeat quote selection.
pub mod rotation;
/// Session state tying source, store, and engine together.
pub mod session;
/// Quote source traits, built-in sources, and the offline pool cache.
pub mod source;
/// Key-value store backends and the tolerant store adapter.
pub mod store;
/// Translation service and cache.
pub mod translate;
/// Shared type aliases.
pub mod types;

mod errors;

pub use category::{CategoryMatcher, CategoryTable, KeywordMatcher};
pub use config::{RotationConfig, SourceConfig, StoreConfig, TranslateConfig};
pub use data::{Quote, QuoteId, QuoteKey, ShownSet};
pub use errors::QuoteError;
pub use locale::{Language, Messages};
pub use rotation::{CategoryPool, DeterministicRng, Rotation, RotationEngine};
pub use session::{PoolOrigin, QuoteSession, Selection};
#[cfg(feature = "http")]
pub use source::HttpQuoteSource;
pub use source::{CachedPool, InMemoryQuoteSource, OfflineSource, PoolCache, QuoteSource};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreAdapter};
#[cfg(feature = "http")]
pub use translate::MyMemoryTranslator;
pub use translate::{TranslationCache, Translator};
pub use types::{CategoryId, EndpointUrl, Keyword, LanguageCode, SourceId, StoreKey};
