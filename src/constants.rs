/// Constants used by category matching and keyword tables.
pub mod category {
    /// Category that matches every quote unconditionally.
    pub const CATEGORY_ALL: &str = "all";
    /// Built-in keyword table in display order (`all` is implicit and listed first).
    pub const BUILTIN_KEYWORDS: &[(&str, &[&str])] = &[
        (
            "life",
            &["life", "live", "living", "exist", "journey", "experience"],
        ),
        (
            "love",
            &["love", "heart", "compassion", "kindness", "care", "affection"],
        ),
        (
            "success",
            &["success", "achieve", "goal", "accomplish", "win", "victory"],
        ),
        (
            "inspire",
            &[
                "inspire",
                "inspiration",
                "motivate",
                "encourage",
                "empower",
                "aspire",
                "dream",
                "possibility",
                "potential",
                "greatness",
            ],
        ),
        (
            "wisdom",
            &["wisdom", "wise", "knowledge", "learn", "understand", "truth"],
        ),
        (
            "time",
            &[
                "time", "moment", "past", "future", "present", "today", "tomorrow",
            ],
        ),
        (
            "change",
            &["change", "transform", "grow", "evolve", "adapt", "different"],
        ),
        (
            "mind",
            &[
                "mind",
                "think",
                "thought",
                "mental",
                "consciousness",
                "imagination",
            ],
        ),
        (
            "dream",
            &["dream", "vision", "hope", "aspiration", "wish", "desire"],
        ),
        (
            "peace",
            &[
                "peace", "calm", "quiet", "tranquil", "serene", "still", "silence", "rest",
                "harmony", "balance", "ease", "gentle", "soothe", "relax",
            ],
        ),
    ];
}

/// Constants used by the rotation engine.
pub mod rotation {
    /// Minimum filtered pool size before a category widens to the full pool.
    pub const MIN_CATEGORY_POOL: usize = 10;
    /// Offset mixed into per-category RNG seed derivation.
    pub const CATEGORY_SEED_OFFSET: u64 = 0x0051_A7E5;
}

/// Constants used by quote sources and payload parsing.
pub mod source {
    /// Default quote-list endpoint (returns every quote in one response).
    pub const DEFAULT_QUOTES_ENDPOINT: &str = "https://dummyjson.com/quotes?limit=0";
    /// Source id used for the default HTTP source.
    pub const DEFAULT_SOURCE_ID: &str = "dummyjson";
    /// Source id used by the in-memory source.
    pub const IN_MEMORY_SOURCE_ID: &str = "in_memory";
    /// Object fields that may wrap the quote array.
    pub const ARRAY_FIELDS: [&str; 2] = ["quotes", "results"];
    /// Record fields that may hold quote text, in priority order.
    pub const TEXT_FIELDS: [&str; 4] = ["quote", "content", "text", "q"];
    /// Record fields that may hold the author, in priority order.
    pub const AUTHOR_FIELDS: [&str; 2] = ["author", "a"];
    /// Record fields that may hold a stable identifier, in priority order.
    pub const ID_FIELDS: [&str; 2] = ["id", "_id"];
    /// Author used when a record carries none.
    pub const UNKNOWN_AUTHOR: &str = "Unknown";
}

/// Constants used by key-value store layout.
pub mod store {
    /// Key holding the last successfully fetched quote pool.
    pub const POOL_CACHE_KEY: &str = "allQuotes";
    /// Prefix for per-category shown-set keys.
    pub const SHOWN_PREFIX: &str = "shownQuotes_";
    /// Prefix for cached translations.
    pub const TRANSLATION_PREFIX: &str = "translation_";
    /// Key holding the saved language preference.
    pub const LANGUAGE_KEY: &str = "language";
    /// Internal key holding the insertion-ordered key index of a file store.
    pub const KEY_INDEX_KEY: &[u8] = b"__keys__";
    /// Tombstone marker byte for removed entries.
    pub const RECORD_TOMBSTONE: u8 = b'-';
    /// Marker byte prefixed to live string values.
    pub const RECORD_LIVE: u8 = b'S';
    /// Default directory for persisted store files.
    pub const DEFAULT_STORE_DIR: &str = ".quote_galaxy";
    /// Default filename for persisted store files.
    pub const DEFAULT_STORE_FILENAME: &str = "store.bin";
}

/// Constants used by the translation service and cache.
pub mod translate {
    /// Default translation endpoint (MyMemory, no key required).
    pub const DEFAULT_TRANSLATE_ENDPOINT: &str = "https://api.mymemory.translated.net/get";
    /// Language quotes are fetched in.
    pub const SOURCE_LANGUAGE: &str = "en";
    /// Status code the translation API reports for a successful translation.
    pub const SUCCESS_STATUS: i64 = 200;
}

/// Constants used by the terminal presenter.
pub mod present {
    /// Application name shown in share text.
    pub const APP_NAME: &str = "Quote Galaxy";
    /// Query parameter carrying a preselected category.
    pub const CATEGORY_PARAM: &str = "category";
}
