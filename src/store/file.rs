use indexmap::IndexSet;
use simd_r_drive::storage_engine::DataStore;
use simd_r_drive::storage_engine::traits::{DataStoreReader, DataStoreWriter};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::config::StoreConfig;
use crate::constants::store::{
    DEFAULT_STORE_FILENAME, KEY_INDEX_KEY, RECORD_LIVE, RECORD_TOMBSTONE,
};
use crate::errors::QuoteError;
use crate::store::KeyValueStore;
use crate::types::StoreKey;

/// File-backed key-value store for persistent runs.
///
/// Values are written to an append-only `simd-r-drive` datastore. Removal
/// writes a tombstone record. Because the datastore addresses entries by
/// key hash, the insertion-ordered key list is persisted alongside the data
/// under an internal key.
pub struct FileStore {
    store: DataStore,
    path: PathBuf,
    index: RwLock<IndexSet<StoreKey>>,
}

impl fmt::Debug for FileStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .finish()
    }
}

impl FileStore {
    /// Open (or create) a file-backed store at `path`.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self, QuoteError> {
        let path = coerce_store_path(path.into());
        ensure_parent_dir(&path)?;
        let store = DataStore::open(path.as_path()).map_err(map_store_err)?;
        let index = load_index(&store)?;
        Ok(Self {
            store,
            path,
            index: RwLock::new(index),
        })
    }

    /// Open the store described by `config`.
    pub fn open_config(config: &StoreConfig) -> Result<Self, QuoteError> {
        Self::open(config.path.clone())
    }

    /// Resolved file path of this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist_index(&self, index: &IndexSet<StoreKey>) -> Result<(), QuoteError> {
        let keys: Vec<&StoreKey> = index.iter().collect();
        let payload = serde_json::to_vec(&keys)
            .map_err(|err| QuoteError::Storage(format!("failed to encode key index: {err}")))?;
        write_bytes(&self.store, KEY_INDEX_KEY, &payload)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, QuoteError> {
        if is_reserved(key) {
            return Ok(None);
        }
        match read_bytes(&self.store, key.as_bytes())? {
            Some(bytes) => decode_value(&bytes),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), QuoteError> {
        reject_reserved(key)?;
        let mut index = self
            .index
            .write()
            .map_err(|_| QuoteError::Storage("key index lock poisoned".into()))?;
        write_bytes(&self.store, key.as_bytes(), &encode_value(Some(value)))?;
        if index.insert(key.to_string()) {
            self.persist_index(&index)?;
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), QuoteError> {
        reject_reserved(key)?;
        let mut index = self
            .index
            .write()
            .map_err(|_| QuoteError::Storage("key index lock poisoned".into()))?;
        if !index.shift_remove(key) {
            return Ok(());
        }
        write_bytes(&self.store, key.as_bytes(), &encode_value(None))?;
        self.persist_index(&index)
    }

    fn keys(&self) -> Result<Vec<StoreKey>, QuoteError> {
        let index = self
            .index
            .read()
            .map_err(|_| QuoteError::Storage("key index lock poisoned".into()))?;
        Ok(index.iter().cloned().collect())
    }
}

fn load_index(store: &DataStore) -> Result<IndexSet<StoreKey>, QuoteError> {
    match read_bytes(store, KEY_INDEX_KEY)? {
        Some(bytes) => {
            let keys: Vec<StoreKey> = serde_json::from_slice(&bytes)
                .map_err(|err| QuoteError::Storage(format!("corrupt key index: {err}")))?;
            Ok(keys.into_iter().collect())
        }
        None => Ok(IndexSet::new()),
    }
}

fn is_reserved(key: &str) -> bool {
    key.as_bytes() == KEY_INDEX_KEY
}

fn reject_reserved(key: &str) -> Result<(), QuoteError> {
    if is_reserved(key) {
        return Err(QuoteError::Storage(format!(
            "key '{key}' is reserved for the key index"
        )));
    }
    Ok(())
}

fn encode_value(value: Option<&str>) -> Vec<u8> {
    match value {
        None => vec![RECORD_TOMBSTONE],
        Some(value) => {
            let mut buf = Vec::with_capacity(1 + value.len());
            buf.push(RECORD_LIVE);
            buf.extend_from_slice(value.as_bytes());
            buf
        }
    }
}

fn decode_value(bytes: &[u8]) -> Result<Option<String>, QuoteError> {
    match bytes.first().copied() {
        None | Some(RECORD_TOMBSTONE) => Ok(None),
        Some(RECORD_LIVE) => String::from_utf8(bytes[1..].to_vec())
            .map(Some)
            .map_err(|err| QuoteError::Storage(format!("corrupt string record: {err}"))),
        Some(other) => Err(QuoteError::Storage(format!(
            "unknown record marker 0x{other:02x}"
        ))),
    }
}

fn read_bytes(store: &DataStore, key: &[u8]) -> Result<Option<Vec<u8>>, QuoteError> {
    store
        .read(key)
        .map_err(map_store_err)?
        .map(|entry| Ok(entry.as_ref().to_vec()))
        .transpose()
}

fn write_bytes(store: &DataStore, key: &[u8], payload: &[u8]) -> Result<(), QuoteError> {
    store.write(key, payload).map_err(map_store_err)?;
    Ok(())
}

fn coerce_store_path(path: PathBuf) -> PathBuf {
    if path.is_dir() {
        return path.join(DEFAULT_STORE_FILENAME);
    }
    path
}

fn ensure_parent_dir(path: &Path) -> Result<(), QuoteError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn map_store_err(err: io::Error) -> QuoteError {
    QuoteError::Storage(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_store_persists_values_and_key_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.bin");
        let store = FileStore::open(&path).unwrap();
        store.set("allQuotes", "[]").unwrap();
        store.set("translation_a", "uno").unwrap();
        store.set("translation_b", "dos").unwrap();
        store.remove("translation_a").unwrap();
        drop(store);

        let again = FileStore::open(&path).unwrap();
        assert_eq!(again.get("allQuotes").unwrap().as_deref(), Some("[]"));
        assert_eq!(again.get("translation_a").unwrap(), None);
        assert_eq!(again.get("translation_b").unwrap().as_deref(), Some("dos"));
        assert_eq!(
            again.keys().unwrap(),
            vec!["allQuotes".to_string(), "translation_b".to_string()]
        );
    }

    #[test]
    fn file_store_accepts_directory_path() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("k", "v").unwrap();
        let expected_file = dir.path().join(DEFAULT_STORE_FILENAME);
        assert!(expected_file.is_file());
        assert_eq!(store.path(), expected_file.as_path());
    }

    #[test]
    fn removed_key_can_be_set_again() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("nested").join("store.bin")).unwrap();
        store.set("k", "first").unwrap();
        store.remove("k").unwrap();
        store.set("k", "second").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
        assert_eq!(store.keys().unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn key_index_slot_is_not_writable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.bin");
        let store = FileStore::open(&path).unwrap();
        store.set("allQuotes", "[]").unwrap();

        let reserved = String::from_utf8(KEY_INDEX_KEY.to_vec()).unwrap();
        let err = store.set(&reserved, "not an index").unwrap_err();
        assert!(matches!(err, QuoteError::Storage(msg) if msg.contains("reserved")));
        assert!(matches!(
            store.remove(&reserved),
            Err(QuoteError::Storage(_))
        ));
        assert_eq!(store.get(&reserved).unwrap(), None);
        drop(store);

        let again = FileStore::open(&path).unwrap();
        assert_eq!(again.keys().unwrap(), vec!["allQuotes".to_string()]);
        assert_eq!(again.get("allQuotes").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn value_records_require_known_marker() {
        assert_eq!(decode_value(&[]).unwrap(), None);
        assert_eq!(decode_value(&[RECORD_TOMBSTONE]).unwrap(), None);
        assert_eq!(
            decode_value(&encode_value(Some(""))).unwrap().as_deref(),
            Some("")
        );
        let err = decode_value(&[0x00, b'x']).unwrap_err();
        assert!(matches!(err, QuoteError::Storage(msg) if msg.contains("unknown record marker")));
    }
}
