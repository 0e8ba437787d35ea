use std::collections::HashSet;
use std::sync::Arc;

use quote_galaxy::{
    CategoryMatcher, CategoryTable, DeterministicRng, InMemoryQuoteSource, KeywordMatcher, Quote,
    QuoteKey, QuoteSession, RotationConfig, RotationEngine, ShownSet, StoreAdapter,
};

fn quote(id: u64, text: &str) -> Quote {
    Quote::numbered(id, text, format!("Author {id}"))
}

/// `matching` quotes mention `keyword`, the rest do not.
fn mixed_pool(total: usize, matching: usize, keyword: &str) -> Vec<Quote> {
    (0..total as u64)
        .map(|id| {
            if (id as usize) < matching {
                quote(id, &format!("A line about {keyword}, number {id}"))
            } else {
                quote(id, &format!("Plain filler sentence {id}"))
            }
        })
        .collect()
}

fn seeded_engine(seed: u64) -> RotationEngine {
    RotationEngine::new(
        Arc::new(KeywordMatcher::default()),
        RotationConfig {
            seed: Some(seed),
            ..RotationConfig::default()
        },
    )
}

#[test]
fn love_category_cycles_through_all_matches_without_repeats() {
    let pool = mixed_pool(12, 11, "love");
    let engine = seeded_engine(0);
    let mut rng = DeterministicRng::new(11);
    let mut shown = ShownSet::new();
    let mut seen = HashSet::new();

    for _ in 0..11 {
        let rotation = engine.next(&pool, &shown, "love", &mut rng).unwrap();
        assert!(!rotation.widened);
        assert!(!rotation.reset);
        assert_eq!(rotation.eligible, 11);
        assert!(rotation.quote.text.contains("love"));
        assert!(seen.insert(rotation.quote.key()), "quote repeated");
        shown = rotation.shown;
    }
    assert_eq!(seen.len(), 11);
    assert_eq!(shown.len(), 11);
}

#[test]
fn narrow_peace_category_widens_to_whole_pool() {
    let pool = mixed_pool(20, 3, "peace");
    let engine = seeded_engine(0);
    let mut rng = DeterministicRng::new(5);
    let mut shown = ShownSet::new();
    let mut drew_non_matching = false;

    for _ in 0..20 {
        let rotation = engine.next(&pool, &shown, "peace", &mut rng).unwrap();
        assert!(rotation.widened);
        assert_eq!(rotation.eligible, 20);
        drew_non_matching |= !rotation.quote.text.contains("peace");
        shown = rotation.shown;
    }
    assert!(drew_non_matching);
    assert_eq!(shown.len(), 20);
}

#[test]
fn exhausted_category_resets_to_single_entry() {
    let pool = mixed_pool(12, 11, "love");
    let engine = seeded_engine(0);
    let filtered: Vec<QuoteKey> = engine
        .category_pool(&pool, "love")
        .quotes
        .iter()
        .map(|quote| quote.key())
        .collect();
    let shown = ShownSet::from_keys(filtered.clone());

    let mut rng = DeterministicRng::new(3);
    let rotation = engine.next(&pool, &shown, "love", &mut rng).unwrap();
    assert!(rotation.reset);
    assert!(filtered.contains(&rotation.quote.key()));
    assert_eq!(rotation.shown.keys(), &[rotation.quote.key()]);
}

#[test]
fn no_repeat_holds_across_a_full_cycle_then_restarts() {
    let pool = mixed_pool(15, 15, "time");
    let engine = seeded_engine(0);
    let mut rng = DeterministicRng::new(21);
    let mut shown = ShownSet::new();

    let mut first_cycle = HashSet::new();
    for _ in 0..15 {
        let rotation = engine.next(&pool, &shown, "time", &mut rng).unwrap();
        assert!(!shown.contains(&rotation.quote.key()));
        first_cycle.insert(rotation.quote.key());
        shown = rotation.shown;
    }
    assert_eq!(first_cycle.len(), 15);

    let rotation = engine.next(&pool, &shown, "time", &mut rng).unwrap();
    assert!(rotation.reset);
    assert_eq!(rotation.shown.len(), 1);
}

#[test]
fn next_does_not_mutate_its_inputs() {
    let pool = mixed_pool(12, 12, "wisdom");
    let engine = seeded_engine(0);
    let shown = ShownSet::new();
    let pool_before = pool.clone();

    let mut rng_a = DeterministicRng::new(8);
    let mut rng_b = DeterministicRng::new(8);
    let a = engine.next(&pool, &shown, "wisdom", &mut rng_a).unwrap();
    let b = engine.next(&pool, &shown, "wisdom", &mut rng_b).unwrap();

    assert_eq!(a.quote, b.quote);
    assert_eq!(pool, pool_before);
    assert!(shown.is_empty());
}

#[test]
fn substring_matching_keeps_known_false_positives() {
    let matcher = KeywordMatcher::default();
    assert!(matcher.matches(&quote(1, "A lifetime of regret"), "life"));
    assert!(matcher.matches(&quote(2, "Never SURRENDER your DREAMS"), "dream"));
    assert!(!matcher.matches(&quote(3, "Plain filler"), "love"));
}

#[test]
fn custom_category_table_drives_filtering() {
    let table = CategoryTable::empty().with_category("ocean", ["sea", "wave", "tide"]);
    let mut pool = mixed_pool(30, 0, "");
    for id in 30..42 {
        pool.push(quote(id, &format!("The tide turns at hour {id}")));
    }
    let engine = RotationEngine::new(
        Arc::new(KeywordMatcher::new(table)),
        RotationConfig {
            seed: Some(1),
            ..RotationConfig::default()
        },
    );
    let pool_view = engine.category_pool(&pool, "ocean");
    assert!(!pool_view.widened);
    assert_eq!(pool_view.quotes.len(), 12);
}

#[test]
fn categories_keep_independent_history_within_a_session() {
    let mut pool = mixed_pool(12, 12, "love");
    pool.extend((100..112).map(|id| quote(id, &format!("Chase the dream {id}"))));
    let mut session = QuoteSession::open(
        Box::new(InMemoryQuoteSource::new(pool)),
        seeded_engine(4),
        StoreAdapter::in_memory(),
    );

    session.select_category("love");
    session.next_quote().unwrap();
    session.next_quote().unwrap();
    assert_eq!(session.viewed(), 2);

    session.select_category("dream");
    assert_eq!(session.viewed(), 0);
    let selection = session.next_quote().unwrap();
    assert!(selection.quote.text.contains("dream"));
    assert_eq!(selection.category, "dream");

    session.select_category("love");
    assert_eq!(session.viewed(), 2);
}
