use std::io;

use thiserror::Error;

use crate::types::{SourceId, StoreKey};

/// Error type for quote fetching, storage, and selection failures.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote source '{source_id}' is unavailable: {reason}")]
    Network { source_id: SourceId, reason: String },
    #[error("quote payload could not be parsed: {0}")]
    Payload(String),
    #[error("key-value store failure: {0}")]
    Storage(String),
    #[error("storage quota exceeded writing '{key}' ({needed} bytes needed, limit {limit})")]
    QuotaExceeded {
        key: StoreKey,
        needed: usize,
        limit: usize,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("no quotes available (no network and no cached quotes)")]
    EmptyResult,
}

impl QuoteError {
    /// True for failures that a caller recovers from by falling back to cached data.
    pub fn is_network(&self) -> bool {
        matches!(self, QuoteError::Network { .. } | QuoteError::Payload(_))
    }

    /// True for write failures the store adapter degrades to "not saved".
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            QuoteError::Storage(_) | QuoteError::QuotaExceeded { .. } | QuoteError::Io(_)
        )
    }
}
