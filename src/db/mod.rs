//! Repository over the stored aggregate.
//!
//! [`Db`] keeps the last committed snapshot in memory and writes the whole
//! aggregate through to storage on every mutation. Mutations take
//! `&mut self`, so there is exactly one writer at a time.

pub mod catalog;
pub mod production;

use opentelemetry::KeyValue;

use crate::config::Config;
use crate::error::Result;
use crate::model::{Aggregate, Collection};
use crate::storage::{FileStore, Storage};
use crate::telemetry::metrics;

/// Database handle. Owns the storage adapter and the current snapshot.
pub struct Db {
    storage: Storage,
    snapshot: Aggregate,
}

impl Db {
    /// Open the file-backed store described by `config`, seeding it if empty.
    pub fn open(config: &Config) -> Result<Self> {
        let backend = FileStore::open(&config.data_dir)?;
        Self::with_storage(Storage::with_backend(backend, config.store_key.clone()))
    }

    /// Create a database over in-memory storage (for testing).
    pub fn in_memory() -> Result<Self> {
        Self::with_storage(Storage::in_memory())
    }

    pub fn with_storage(mut storage: Storage) -> Result<Self> {
        let snapshot = storage.load()?;
        Ok(Self { storage, snapshot })
    }

    /// A full copy of the aggregate, decoupled from later writes.
    pub fn list(&self) -> Aggregate {
        self.snapshot.clone()
    }

    /// Borrow the current snapshot without copying it.
    pub fn snapshot(&self) -> &Aggregate {
        &self.snapshot
    }

    /// Re-read the stored aggregate, dropping the in-memory snapshot.
    ///
    /// Picks up writes made by another process since this handle loaded.
    pub fn reload(&mut self) -> Result<()> {
        self.snapshot = self.storage.load()?;
        Ok(())
    }

    /// Throw away all stored data and start over from the seed dataset.
    pub fn reset(&mut self) -> Result<()> {
        self.snapshot = self.storage.reset()?;
        tracing::warn!(key = self.storage.key(), "store reset to seed dataset");
        Ok(())
    }

    /// Pretty-printed JSON of the current aggregate.
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.snapshot).map_err(crate::error::Error::Serialize)
    }

    /// Apply `f` to a copy of the snapshot and persist the result.
    ///
    /// The copy replaces the snapshot only once the write succeeded. If `f`
    /// fails, nothing is written.
    fn commit<T>(&mut self, f: impl FnOnce(&mut Aggregate) -> Result<T>) -> Result<T> {
        let mut next = self.snapshot.clone();
        let out = f(&mut next)?;
        self.storage.save(&next)?;
        self.snapshot = next;
        Ok(out)
    }
}

/// Count one repository mutation.
/// `result` is "ok" or "not_found".
fn count_mutation(collection: Collection, operation: &'static str, result: &'static str) {
    metrics::record_mutations().add(
        1,
        &[
            KeyValue::new("collection", collection.key()),
            KeyValue::new("operation", operation),
            KeyValue::new("result", result),
        ],
    );
}
