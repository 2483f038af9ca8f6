//! Generic CRUD over the four catalog collections.

use super::{Db, count_mutation};
use crate::error::{Error, Result};
use crate::model::*;
use crate::telemetry::ops;

impl Db {
    /// Create a catalog record with a fresh id and append it.
    ///
    /// Fails with [`Error::Invalid`] if a field fails [`CatalogEntity::validate`].
    pub fn add<T: CatalogEntity>(&mut self, draft: T::Draft) -> Result<T> {
        let span = ops::start_mutation_span(T::COLLECTION, "add");
        let _enter = span.enter();

        let record = self.commit(|data| {
            let id = data.fresh_id(T::COLLECTION);
            let record = T::from_draft(id, draft);
            record.validate()?;
            T::items_mut(data).push(record.clone());
            Ok(record)
        })?;

        ops::record_target(&span, record.id().as_str());
        count_mutation(T::COLLECTION, "add", "ok");
        tracing::info!(collection = %T::COLLECTION, id = %record.id(), "record added");
        Ok(record)
    }

    /// Replace the first record whose id matches `record`'s.
    ///
    /// Fails with [`Error::NotFound`] and writes nothing if no record matches,
    /// or with [`Error::Invalid`] if the record fails validation.
    pub fn update<T: CatalogEntity>(&mut self, record: T) -> Result<()> {
        let span = ops::start_mutation_span(T::COLLECTION, "update");
        let _enter = span.enter();
        ops::record_target(&span, record.id().as_str());
        record.validate()?;

        let result = self.commit(|data| {
            let items = T::items_mut(data);
            match items.iter().position(|r| r.id() == record.id()) {
                Some(index) => {
                    items[index] = record.clone();
                    Ok(())
                }
                None => Err(Error::NotFound {
                    collection: T::COLLECTION,
                    id: record.id().to_string(),
                }),
            }
        });

        match &result {
            Ok(()) => {
                count_mutation(T::COLLECTION, "update", "ok");
                tracing::info!(collection = %T::COLLECTION, id = %record.id(), "record updated");
            }
            Err(Error::NotFound { .. }) => {
                count_mutation(T::COLLECTION, "update", "not_found");
                tracing::warn!(collection = %T::COLLECTION, id = %record.id(), "update target missing");
            }
            Err(_) => {}
        }
        result
    }

    /// Remove every record with `id` and persist, even if none matched.
    ///
    /// Returns how many records were removed. Orders referencing the removed
    /// record are left untouched.
    pub fn delete<T: CatalogEntity>(&mut self, id: &RecordId) -> Result<usize> {
        let span = ops::start_mutation_span(T::COLLECTION, "delete");
        let _enter = span.enter();
        ops::record_target(&span, id.as_str());

        let removed = self.commit(|data| {
            let items = T::items_mut(data);
            let before = items.len();
            items.retain(|r| r.id() != id);
            Ok(before - items.len())
        })?;

        let result = if removed == 0 { "not_found" } else { "ok" };
        count_mutation(T::COLLECTION, "delete", result);
        tracing::info!(collection = %T::COLLECTION, %id, removed, "records deleted");
        Ok(removed)
    }

    /// Look up a catalog record by id in the current snapshot.
    pub fn get<T: CatalogEntity>(&self, id: &RecordId) -> Option<&T> {
        T::items(self.snapshot()).iter().find(|r| r.id() == id)
    }

    // -----------------------------------------------------------------------
    // Dynamic entry points for the generic editor
    // -----------------------------------------------------------------------

    /// Create a record from a tagged draft.
    pub fn add_item(&mut self, draft: Draft) -> Result<Record> {
        Ok(match draft {
            Draft::Workshop(d) => self.add::<Workshop>(d)?.into_record(),
            Draft::Article(d) => self.add::<Article>(d)?.into_record(),
            Draft::Task(d) => self.add::<Task>(d)?.into_record(),
            Draft::Process(d) => self.add::<Process>(d)?.into_record(),
        })
    }

    /// Replace a record of any collection. Orders go through
    /// [`Db::update_order`].
    pub fn update_item(&mut self, record: Record) -> Result<()> {
        match record {
            Record::Workshop(r) => self.update(r),
            Record::Article(r) => self.update(r),
            Record::Task(r) => self.update(r),
            Record::Process(r) => self.update(r),
            Record::Production(r) => self.update_order(r),
        }
    }

    /// Delete by id from any collection. Orders go through
    /// [`Db::delete_order`].
    pub fn delete_item(&mut self, collection: Collection, id: &RecordId) -> Result<usize> {
        match collection {
            Collection::Workshops => self.delete::<Workshop>(id),
            Collection::Articles => self.delete::<Article>(id),
            Collection::Tasks => self.delete::<Task>(id),
            Collection::Processes => self.delete::<Process>(id),
            Collection::Production => self.delete_order(id),
        }
    }
}
