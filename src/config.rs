use std::path::PathBuf;

use crate::constants::rotation::MIN_CATEGORY_POOL;
use crate::constants::source::{DEFAULT_QUOTES_ENDPOINT, DEFAULT_SOURCE_ID};
use crate::constants::store::{DEFAULT_STORE_DIR, DEFAULT_STORE_FILENAME};
use crate::constants::translate::DEFAULT_TRANSLATE_ENDPOINT;
use crate::types::{EndpointUrl, SourceId};

/// Rotation engine behavior.
#[derive(Clone, Debug)]
pub struct RotationConfig {
    /// RNG seed combined with the category id; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Categories matching fewer quotes than this sample from the full pool instead.
    pub min_category_pool: usize,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            min_category_pool: MIN_CATEGORY_POOL,
        }
    }
}

/// Remote quote source settings.
#[derive(Clone, Debug)]
pub struct SourceConfig {
    /// Stable source identifier used in errors and logs.
    pub source_id: SourceId,
    /// Quote-list endpoint fetched with a single GET.
    pub endpoint: EndpointUrl,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            source_id: DEFAULT_SOURCE_ID.to_string(),
            endpoint: DEFAULT_QUOTES_ENDPOINT.to_string(),
        }
    }
}

/// Translation service settings.
#[derive(Clone, Debug)]
pub struct TranslateConfig {
    /// Translation endpoint queried with `q` and `langpair`.
    pub endpoint: EndpointUrl,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_TRANSLATE_ENDPOINT.to_string(),
        }
    }
}

/// Location of the persisted key-value store.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// File path of the store (a directory gets the default filename appended).
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path_in_dir(DEFAULT_STORE_DIR),
        }
    }
}

impl StoreConfig {
    /// Default store file path inside a custom directory.
    pub fn default_path_in_dir<P: Into<PathBuf>>(dir: P) -> PathBuf {
        dir.into().join(DEFAULT_STORE_FILENAME)
    }
}
