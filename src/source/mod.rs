//! Quote source interfaces and the offline pool cache.
//!
//! Ownership model:
//! - `QuoteSource` fetches the full quote list from somewhere remote.
//! - `PoolCache` persists the last successful fetch and serves it back
//!   when the source is unreachable. It never fails loudly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::constants::source::IN_MEMORY_SOURCE_ID;
use crate::constants::store::POOL_CACHE_KEY;
use crate::data::Quote;
use crate::errors::QuoteError;
use crate::store::StoreAdapter;
use crate::types::SourceId;

/// Upstream payload parsing.
pub mod payload;
#[cfg(feature = "http")]
/// ureq-backed HTTP quote source.
pub mod http;

#[cfg(feature = "http")]
pub use http::HttpQuoteSource;
pub use payload::parse_quote_payload;

/// Bulk quote provider.
pub trait QuoteSource: Send + Sync {
    /// Stable source identifier used in errors and logs.
    fn id(&self) -> &str;
    /// Fetch every available quote.
    ///
    /// Fails with `QuoteError::Network` (or `QuoteError::Payload`) when the
    /// remote call does not complete successfully.
    fn fetch_all(&self) -> Result<Vec<Quote>, QuoteError>;
}

/// In-memory quote source for tests and bundled quote lists.
pub struct InMemoryQuoteSource {
    id: SourceId,
    quotes: Arc<Vec<Quote>>,
}

impl InMemoryQuoteSource {
    /// Create an in-memory source from prebuilt quotes.
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self::with_id(IN_MEMORY_SOURCE_ID, quotes)
    }

    pub fn with_id(id: impl Into<SourceId>, quotes: Vec<Quote>) -> Self {
        Self {
            id: id.into(),
            quotes: Arc::new(quotes),
        }
    }
}

impl QuoteSource for InMemoryQuoteSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn fetch_all(&self) -> Result<Vec<Quote>, QuoteError> {
        Ok(self.quotes.as_ref().clone())
    }
}

/// Source that is never reachable; used for explicit offline runs.
pub struct OfflineSource;

impl QuoteSource for OfflineSource {
    fn id(&self) -> &str {
        "offline"
    }

    fn fetch_all(&self) -> Result<Vec<Quote>, QuoteError> {
        Err(QuoteError::Network {
            source_id: self.id().to_string(),
            reason: "network access disabled".into(),
        })
    }
}

/// Persisted pool snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CachedPool {
    /// When the pool was fetched.
    pub cached_at: DateTime<Utc>,
    /// The fetched quotes, in fetch order.
    pub quotes: Vec<Quote>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPool {
    Snapshot(CachedPool),
    Legacy(Vec<Quote>),
}

/// Offline cache of the last successfully fetched quote pool.
#[derive(Clone)]
pub struct PoolCache {
    store: StoreAdapter,
}

impl PoolCache {
    pub fn new(store: StoreAdapter) -> Self {
        Self { store }
    }

    /// Replace the cached pool with `quotes`. Returns `false` when not saved.
    pub fn store_pool(&self, quotes: &[Quote]) -> bool {
        let snapshot = CachedPool {
            cached_at: Utc::now(),
            quotes: quotes.to_vec(),
        };
        let saved = self.store.set_json(POOL_CACHE_KEY, &snapshot);
        if saved {
            debug!(
                "[quote_galaxy:cache] cached {} quotes under '{}'",
                quotes.len(),
                POOL_CACHE_KEY
            );
        }
        saved
    }

    /// Load the cached snapshot, if any.
    pub fn load_snapshot(&self) -> Option<CachedPool> {
        match self.store.get_json::<StoredPool>(POOL_CACHE_KEY)? {
            StoredPool::Snapshot(snapshot) => Some(snapshot),
            StoredPool::Legacy(quotes) => {
                warn!(
                    "[quote_galaxy:cache] loaded legacy pool without timestamp ({} quotes)",
                    quotes.len()
                );
                Some(CachedPool {
                    cached_at: DateTime::<Utc>::default(),
                    quotes,
                })
            }
        }
    }

    /// Load the cached pool; empty when nothing (or nothing readable) is cached.
    pub fn load_cached(&self) -> Vec<Quote> {
        self.load_snapshot()
            .map(|snapshot| snapshot.quotes)
            .unwrap_or_default()
    }
}
