//! Quote selection: category filtering, widening, no-repeat sampling, and
//! reset on exhaustion.
//!
//! The engine is pure. It takes the pool and the current shown-set and
//! returns the selected quote together with the updated shown-set; callers
//! decide whether and where to persist it.

use rand::Rng;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::category::{CategoryMatcher, KeywordMatcher};
use crate::config::RotationConfig;
use crate::constants::category::CATEGORY_ALL;
use crate::data::{Quote, QuoteKey, ShownSet};
use crate::errors::QuoteError;

#[derive(Debug, Clone)]
/// Small deterministic RNG used for reproducible rotations.
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn state(&self) -> u64 {
        self.state
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl rand::RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let value = self.next_u64_internal();
            let bytes = value.to_le_bytes();
            let remaining = dest.len() - offset;
            let copy_len = remaining.min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

/// The effective sampling space for a category.
#[derive(Debug)]
pub struct CategoryPool<'a> {
    /// Quotes eligible for the category (after any widening).
    pub quotes: Vec<&'a Quote>,
    /// True when the keyword filter was too narrow and the full pool is used.
    pub widened: bool,
}

/// Result of one rotation step.
#[derive(Clone, Debug)]
pub struct Rotation {
    /// Selected quote.
    pub quote: Quote,
    /// Shown-set after recording the selection.
    pub shown: ShownSet,
    /// Advisory: the category matched too few quotes and the full pool was sampled.
    pub widened: bool,
    /// The shown-set was exhausted and reset before this selection.
    pub reset: bool,
    /// Size of the effective sampling space.
    pub eligible: usize,
}

/// Selects the next quote for a category without immediate repeats.
#[derive(Clone)]
pub struct RotationEngine {
    matcher: Arc<dyn CategoryMatcher>,
    config: RotationConfig,
}

impl Default for RotationEngine {
    fn default() -> Self {
        Self::new(Arc::new(KeywordMatcher::default()), RotationConfig::default())
    }
}

impl RotationEngine {
    pub fn new(matcher: Arc<dyn CategoryMatcher>, config: RotationConfig) -> Self {
        Self { matcher, config }
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    /// Filter `pool` for `category`, widening to the whole pool when the match is too narrow.
    pub fn category_pool<'a>(&self, pool: &'a [Quote], category: &str) -> CategoryPool<'a> {
        if category == CATEGORY_ALL {
            return CategoryPool {
                quotes: pool.iter().collect(),
                widened: false,
            };
        }
        let filtered: Vec<&Quote> = pool
            .iter()
            .filter(|quote| self.matcher.matches(quote, category))
            .collect();
        if filtered.len() < self.config.min_category_pool {
            debug!(
                "[quote_galaxy:rotation] category '{}' matched {} quotes (< {}); widening to full pool",
                category,
                filtered.len(),
                self.config.min_category_pool
            );
            return CategoryPool {
                quotes: pool.iter().collect(),
                widened: true,
            };
        }
        CategoryPool {
            quotes: filtered,
            widened: false,
        }
    }

    /// Pick the next quote for `category`.
    ///
    /// Quotes whose key is in `shown` are skipped. When every eligible quote
    /// has been shown, the shown-set is cleared and the whole eligible pool
    /// is sampled again. Keys outside the eligible pool are dropped from the
    /// returned shown-set, so it is always a subset of that pool.
    pub fn next<R: Rng + ?Sized>(
        &self,
        pool: &[Quote],
        shown: &ShownSet,
        category: &str,
        rng: &mut R,
    ) -> Result<Rotation, QuoteError> {
        if pool.is_empty() {
            return Err(QuoteError::EmptyResult);
        }
        let CategoryPool { quotes, widened } = self.category_pool(pool, category);

        let shown = {
            let eligible: HashSet<QuoteKey> = quotes.iter().map(|quote| quote.key()).collect();
            let kept: Vec<QuoteKey> = shown
                .keys()
                .iter()
                .filter(|key| eligible.contains(*key))
                .cloned()
                .collect();
            if kept.len() < shown.len() {
                debug!(
                    "[quote_galaxy:rotation] dropped {} shown keys outside category '{}'",
                    shown.len() - kept.len(),
                    category
                );
            }
            ShownSet::from_keys(kept)
        };

        let available: Vec<&Quote> = {
            let seen = shown.lookup();
            quotes
                .iter()
                .copied()
                .filter(|quote| !seen.contains(&quote.key()))
                .collect()
        };

        let (available, mut next_shown, reset) = if available.is_empty() {
            debug!(
                "[quote_galaxy:rotation] category '{}' exhausted after {} shown; resetting",
                category,
                shown.len()
            );
            (quotes.clone(), ShownSet::new(), true)
        } else {
            (available, shown, false)
        };

        let idx = rng.random_range(0..available.len());
        let quote = available[idx].clone();
        next_shown.push(quote.key());

        Ok(Rotation {
            quote,
            shown: next_shown,
            widened,
            reset,
            eligible: quotes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuoteId;
    use rand::RngCore;

    fn pool_with(matching: usize, other: usize, keyword: &str) -> Vec<Quote> {
        let mut pool = Vec::new();
        for idx in 0..matching {
            pool.push(Quote::numbered(
                idx as u64,
                format!("All about {keyword} number {idx}"),
                "Author",
            ));
        }
        for idx in 0..other {
            pool.push(Quote::numbered(
                (matching + idx) as u64,
                format!("Unrelated words {idx}"),
                "Author",
            ));
        }
        pool
    }

    #[test]
    fn deterministic_rng_is_reproducible_and_fills_partial_words() {
        let mut a = DeterministicRng::new(9);
        let mut b = DeterministicRng::new(9);
        assert_eq!(a.next_u64(), b.next_u64());
        assert_eq!(a.state(), b.state());

        let mut buf = [0u8; 11];
        a.fill_bytes(&mut buf);
        let mut other = [0u8; 11];
        b.fill_bytes(&mut other);
        assert_eq!(buf, other);
    }

    #[test]
    fn empty_pool_is_an_empty_result() {
        let engine = RotationEngine::default();
        let mut rng = DeterministicRng::new(1);
        let err = engine
            .next(&[], &ShownSet::new(), "all", &mut rng)
            .unwrap_err();
        assert!(matches!(err, QuoteError::EmptyResult));
    }

    #[test]
    fn narrow_category_widens_to_full_pool() {
        let engine = RotationEngine::default();
        let pool = pool_with(3, 17, "peace");
        let category_pool = engine.category_pool(&pool, "peace");
        assert!(category_pool.widened);
        assert_eq!(category_pool.quotes.len(), 20);

        let all_pool = engine.category_pool(&pool, "all");
        assert!(!all_pool.widened);
        assert_eq!(all_pool.quotes.len(), 20);
    }

    #[test]
    fn widening_threshold_is_configurable() {
        let engine = RotationEngine::new(
            Arc::new(KeywordMatcher::default()),
            RotationConfig {
                min_category_pool: 3,
                ..RotationConfig::default()
            },
        );
        let pool = pool_with(3, 17, "peace");
        let category_pool = engine.category_pool(&pool, "peace");
        assert!(!category_pool.widened);
        assert_eq!(category_pool.quotes.len(), 3);
    }

    #[test]
    fn stale_shown_keys_do_not_block_selection() {
        let engine = RotationEngine::default();
        let pool = pool_with(0, 2, "x");
        let shown = ShownSet::from_keys(vec![
            QuoteKey::Id(QuoteId::Numeric(999)),
            QuoteKey::Id(QuoteId::Text("gone".into())),
        ]);
        let mut rng = DeterministicRng::new(5);
        let rotation = engine.next(&pool, &shown, "all", &mut rng).unwrap();
        assert!(!rotation.reset);
        assert_eq!(rotation.shown.keys(), &[rotation.quote.key()]);
    }

    #[test]
    fn shown_set_stays_within_filtered_pool() {
        let engine = RotationEngine::default();
        let mut pool = pool_with(11, 0, "love");
        pool.push(Quote::numbered(100, "Plain filler", "Author"));
        let shown = ShownSet::from_keys(vec![
            QuoteKey::Id(QuoteId::Numeric(100)),
            QuoteKey::Id(QuoteId::Numeric(999)),
            QuoteKey::Id(QuoteId::Numeric(4)),
        ]);
        let mut rng = DeterministicRng::new(17);
        let rotation = engine.next(&pool, &shown, "love", &mut rng).unwrap();

        let filtered: HashSet<QuoteKey> = engine
            .category_pool(&pool, "love")
            .quotes
            .iter()
            .map(|quote| quote.key())
            .collect();
        assert!(!rotation.widened);
        assert!(rotation.shown.keys().iter().all(|key| filtered.contains(key)));
        assert_eq!(rotation.shown.len(), 2);
        assert_eq!(rotation.shown.keys()[0], QuoteKey::Id(QuoteId::Numeric(4)));
        assert_ne!(rotation.quote.key(), QuoteKey::Id(QuoteId::Numeric(4)));
    }

    #[test]
    fn stale_only_shown_set_resets_when_pool_exhausted() {
        let engine = RotationEngine::default();
        let pool = pool_with(0, 1, "x");
        let mut shown = ShownSet::from_keys(vec![QuoteKey::Id(QuoteId::Numeric(999))]);
        shown.push(pool[0].key());
        let mut rng = DeterministicRng::new(5);
        let rotation = engine.next(&pool, &shown, "all", &mut rng).unwrap();
        assert!(rotation.reset);
        assert_eq!(rotation.shown.keys(), &[pool[0].key()]);
    }

    #[test]
    fn structural_keys_deduplicate_anonymous_quotes() {
        let engine = RotationEngine::default();
        let pool: Vec<Quote> = (0..4)
            .map(|idx| Quote::anonymous(format!("quote {idx}"), "Anon"))
            .collect();
        let mut shown = ShownSet::new();
        let mut seen = HashSet::new();
        let mut rng = DeterministicRng::new(11);
        for _ in 0..pool.len() {
            let rotation = engine.next(&pool, &shown, "all", &mut rng).unwrap();
            assert!(seen.insert(rotation.quote.text.clone()));
            shown = rotation.shown;
        }
        assert_eq!(shown.len(), pool.len());
    }
}
