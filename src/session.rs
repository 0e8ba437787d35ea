//! Session-scoped orchestration around the rotation engine.
//!
//! `QuoteSession` owns the pool, the active category with its shown-set,
//! and the offline flag. It calls the pure engine and persists the state
//! the engine returns.

use tracing::{debug, info, warn};

use crate::constants::category::CATEGORY_ALL;
use crate::constants::rotation::CATEGORY_SEED_OFFSET;
use crate::constants::store::SHOWN_PREFIX;
use crate::data::{Quote, ShownSet};
use crate::errors::QuoteError;
use crate::hash::stable_hash_str;
use crate::rotation::{DeterministicRng, RotationEngine};
use crate::source::{PoolCache, QuoteSource};
use crate::store::StoreAdapter;
use crate::types::{CategoryId, StoreKey};

/// Store key holding the shown-set for `category`.
pub fn shown_key(category: &str) -> StoreKey {
    format!("{SHOWN_PREFIX}{category}")
}

/// Where the current pool came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolOrigin {
    /// Nothing loaded yet.
    Empty,
    /// Loaded from the offline cache.
    Cache,
    /// Fetched from the quote source during this session.
    Network,
}

/// One quote ready for presentation.
#[derive(Clone, Debug)]
pub struct Selection {
    /// The selected quote.
    pub quote: Quote,
    /// Category the quote was selected for.
    pub category: CategoryId,
    /// The category matched too few quotes and the whole pool was sampled.
    pub widened: bool,
    /// Every eligible quote had been shown; history restarted with this one.
    pub reset: bool,
    /// The pool is served from cache because the source was unreachable.
    pub offline: bool,
    /// Quotes shown in the current category cycle, including this one.
    pub viewed: usize,
    /// Size of the sampling space the quote was drawn from.
    pub eligible: usize,
}

/// Single-session context for quote rotation.
///
/// Methods that fetch take `&mut self`, so a second refresh cannot start
/// while one is outstanding.
pub struct QuoteSession {
    source: Box<dyn QuoteSource>,
    engine: RotationEngine,
    store: StoreAdapter,
    cache: PoolCache,
    pool: Vec<Quote>,
    origin: PoolOrigin,
    category: CategoryId,
    shown: ShownSet,
    rng: DeterministicRng,
    offline: bool,
}

impl QuoteSession {
    /// Create a session, preloading any cached pool and selecting `all`.
    pub fn open(
        source: Box<dyn QuoteSource>,
        engine: RotationEngine,
        store: StoreAdapter,
    ) -> Self {
        let cache = PoolCache::new(store.clone());
        let pool = cache.load_cached();
        let origin = if pool.is_empty() {
            PoolOrigin::Empty
        } else {
            info!(
                "[quote_galaxy:session] loaded {} quotes from cache",
                pool.len()
            );
            PoolOrigin::Cache
        };
        let rng = category_rng(engine.config().seed, CATEGORY_ALL);
        let mut session = Self {
            source,
            engine,
            store,
            cache,
            pool,
            origin,
            category: CATEGORY_ALL.to_string(),
            shown: ShownSet::new(),
            rng,
            offline: false,
        };
        session.select_category(CATEGORY_ALL);
        session
    }

    pub fn pool(&self) -> &[Quote] {
        &self.pool
    }

    pub fn origin(&self) -> PoolOrigin {
        self.origin
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn shown(&self) -> &ShownSet {
        &self.shown
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Number of quotes shown in the current category cycle.
    pub fn viewed(&self) -> usize {
        self.shown.len()
    }

    pub fn engine(&self) -> &RotationEngine {
        &self.engine
    }

    /// Make `category` active and load its shown-set from the store.
    pub fn select_category(&mut self, category: impl Into<CategoryId>) {
        let category = category.into();
        self.shown = self
            .store
            .get_json::<ShownSet>(&shown_key(&category))
            .unwrap_or_default();
        self.rng = category_rng(self.engine.config().seed, &category);
        debug!(
            "[quote_galaxy:session] selected category '{}' ({} already shown)",
            category,
            self.shown.len()
        );
        self.category = category;
    }

    /// Forget the shown history of the active category.
    pub fn reset_history(&mut self) -> bool {
        self.shown.clear();
        self.store.set_json(&shown_key(&self.category), &self.shown)
    }

    /// Fetch the pool from the source, falling back to the offline cache.
    ///
    /// Returns the pool size. Fails with `QuoteError::EmptyResult` only when
    /// the fetch failed and no quotes are cached or already loaded.
    pub fn refresh(&mut self) -> Result<usize, QuoteError> {
        let fetched = self.source.fetch_all().and_then(|quotes| {
            if quotes.is_empty() {
                Err(QuoteError::Network {
                    source_id: self.source.id().to_string(),
                    reason: "source returned no quotes".into(),
                })
            } else {
                Ok(quotes)
            }
        });
        match fetched {
            Ok(quotes) => {
                self.cache.store_pool(&quotes);
                self.pool = quotes;
                self.origin = PoolOrigin::Network;
                self.offline = false;
                Ok(self.pool.len())
            }
            Err(err) => {
                warn!(
                    "[quote_galaxy:session] fetch from '{}' failed, using cache: {}",
                    self.source.id(),
                    err
                );
                self.offline = true;
                let cached = self.cache.load_cached();
                if !cached.is_empty() {
                    self.pool = cached;
                    self.origin = PoolOrigin::Cache;
                    return Ok(self.pool.len());
                }
                if !self.pool.is_empty() {
                    return Ok(self.pool.len());
                }
                Err(QuoteError::EmptyResult)
            }
        }
    }

    /// Select, record, and persist the next quote for the active category.
    ///
    /// Fetches first when the pool is empty.
    pub fn next_quote(&mut self) -> Result<Selection, QuoteError> {
        if self.pool.is_empty() {
            self.refresh()?;
        }
        let rotation = self
            .engine
            .next(&self.pool, &self.shown, &self.category, &mut self.rng)?;
        self.shown = rotation.shown;
        if !self.store.set_json(&shown_key(&self.category), &self.shown) {
            debug!(
                "[quote_galaxy:session] shown history for '{}' not persisted",
                self.category
            );
        }
        Ok(Selection {
            quote: rotation.quote,
            category: self.category.clone(),
            widened: rotation.widened,
            reset: rotation.reset,
            offline: self.offline,
            viewed: self.shown.len(),
            eligible: rotation.eligible,
        })
    }
}

fn category_rng(seed: Option<u64>, category: &str) -> DeterministicRng {
    match seed {
        Some(seed) => {
            DeterministicRng::new(seed ^ stable_hash_str(CATEGORY_SEED_OFFSET, category))
        }
        None => DeterministicRng::new(rand::random()),
    }
}
