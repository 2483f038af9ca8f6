//! Key-value storage and the aggregate adapter on top of it.
//!
//! The whole dataset is one JSON blob under one key. Reads parse the full
//! blob, writes overwrite it. There is no partial update and no versioning:
//! the last writer wins.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use opentelemetry::KeyValue;

use crate::error::{Error, Result};
use crate::model::Aggregate;
use crate::model::seed::default_aggregate;
use crate::telemetry::metrics;

/// Key the aggregate is stored under unless configured otherwise.
pub const DEFAULT_KEY: &str = "rotten_future_erp_data_v1";

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// A string-keyed store of string values.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Process-local store. Contents vanish with the value.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key inside a directory.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` as the store, creating it if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(Error::Invalid(format!("storage key not usable as a file name: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| Error::Corrupt(Box::new(e)))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate adapter
// ---------------------------------------------------------------------------

/// Reads and writes the aggregate as a single blob.
pub struct Storage {
    backend: Box<dyn KeyValueStore>,
    key: String,
}

impl Storage {
    /// Open a file-backed store in `dir` under the default key.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_backend(FileStore::open(dir)?, DEFAULT_KEY))
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> Self {
        Self::with_backend(MemoryStore::new(), DEFAULT_KEY)
    }

    pub fn with_backend(backend: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        Self {
            backend: Box::new(backend),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the aggregate, seeding the store on first access.
    ///
    /// A stored value that does not parse is an error; it is never replaced.
    pub fn load(&mut self) -> Result<Aggregate> {
        match self.backend.get(&self.key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| Error::Corrupt(Box::new(e))),
            None => {
                tracing::info!(key = %self.key, "no stored data, writing seed dataset");
                let seed = default_aggregate();
                self.save(&seed)?;
                Ok(seed)
            }
        }
    }

    /// Overwrite the stored aggregate.
    pub fn save(&mut self, data: &Aggregate) -> Result<()> {
        let raw = serde_json::to_string(data).map_err(Error::Serialize)?;
        self.backend.set(&self.key, &raw)?;

        metrics::store_writes().add(1, &[KeyValue::new("key", self.key.clone())]);
        metrics::store_write_bytes().record(raw.len() as u64, &[]);
        tracing::debug!(key = %self.key, bytes = raw.len(), "aggregate saved");
        Ok(())
    }

    /// Replace whatever is stored with a fresh seed dataset.
    pub fn reset(&mut self) -> Result<Aggregate> {
        self.backend.remove(&self.key)?;
        self.load()
    }

    /// Pretty-printed copy of the stored aggregate.
    pub fn export_json(&mut self) -> Result<String> {
        let data = self.load()?;
        serde_json::to_string_pretty(&data).map_err(Error::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_load_writes_seed() {
        let mut storage = Storage::in_memory();

        let data = storage.load().unwrap();
        assert_eq!(data.workshops.len(), 2);
        assert_eq!(data.articles.len(), 3);
        assert_eq!(data.tasks.len(), 4);
        assert_eq!(data.processes.len(), 2);
        assert_eq!(data.production.len(), 1);

        assert!(storage.backend.get(DEFAULT_KEY).unwrap().is_some());
    }

    #[test]
    fn second_load_reads_stored_value_not_seed() {
        let mut storage = Storage::in_memory();
        let mut data = storage.load().unwrap();
        data.workshops.clear();
        storage.save(&data).unwrap();

        let reloaded = storage.load().unwrap();
        assert!(reloaded.workshops.is_empty());
    }

    #[test]
    fn malformed_value_is_an_error() {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_KEY, "this is not valid json {{{").unwrap();
        let mut storage = Storage::with_backend(store, DEFAULT_KEY);

        match storage.load() {
            Err(Error::Corrupt(_)) => {}
            other => panic!("expected Corrupt, got {:?}", other),
        }
        // The bad value is left alone.
        assert_eq!(
            storage.backend.get(DEFAULT_KEY).unwrap().as_deref(),
            Some("this is not valid json {{{")
        );
    }

    #[test]
    fn missing_collection_is_an_error() {
        let mut store = MemoryStore::new();
        store
            .set(DEFAULT_KEY, r#"{"workshops":[],"articles":[],"tasks":[],"processes":[]}"#)
            .unwrap();
        let mut storage = Storage::with_backend(store, DEFAULT_KEY);

        assert!(matches!(storage.load(), Err(Error::Corrupt(_))));
    }

    #[test]
    fn file_with_invalid_utf8_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(format!("{DEFAULT_KEY}.json")), [0xff, 0xfe, b'{']).unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(matches!(store.get(DEFAULT_KEY), Err(Error::Corrupt(_))));

        let mut storage = Storage::with_backend(store, DEFAULT_KEY);
        assert!(matches!(storage.load(), Err(Error::Corrupt(_))));
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert!(matches!(store.get("../escape"), Err(Error::Invalid(_))));
        assert!(matches!(store.get(""), Err(Error::Invalid(_))));
        assert!(store.get("rotten_future_erp_data_v1").unwrap().is_none());
    }
}
