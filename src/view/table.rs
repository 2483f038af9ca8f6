//! Table listing and record editor for one collection.
//!
//! A [`TableView`] is either listing records or editing one in its modal.
//! Saving is synchronous: it either writes and returns to the listing, or it
//! is blocked and the editor stays open.

use chrono::Local;

use super::fields::{CollectionView, FieldDescriptor, FieldKind, Form, view_of};
use crate::db::Db;
use crate::error::{Error, Result};
use crate::model::{Aggregate, Collection, Record, RecordId};

/// Shown in place of rows when nothing matches.
pub const EMPTY_STATE: &str = "No se encontraron datos.";

/// Prompt shown before a record is deleted.
pub const DELETE_PROMPT: &str = "¿Estás seguro de eliminar este registro?";

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Which record the editor is working on.
#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
    New,
    Existing(RecordId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Listing,
    Editing { target: EditTarget, form: Form },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// Written; the view is back to listing.
    Saved(Record),
    /// The presence check failed; the editor is still open.
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(usize),
    Declined,
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RecordId,
    pub cells: Vec<String>,
}

/// What the listing shows right now.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub title: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Row>,
}

impl Listing {
    /// The empty-state message, when there are no rows to show.
    pub fn empty_message(&self) -> Option<&'static str> {
        self.rows.is_empty().then_some(EMPTY_STATE)
    }
}

/// Listing + editor state for one collection.
#[derive(Debug, Clone)]
pub struct TableView {
    collection: Collection,
    search: String,
    mode: Mode,
}

impl TableView {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            search: String::new(),
            mode: Mode::Listing,
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn config(&self) -> &'static CollectionView {
        view_of(self.collection)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Filter the listing by a case-insensitive substring of each record's
    /// serialized form. Never touches stored data.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Records of this collection that match the current search.
    pub fn visible(&self, data: &Aggregate) -> Vec<Record> {
        let needle = self.search.to_lowercase();
        data.records(self.collection)
            .into_iter()
            .filter(|r| needle.is_empty() || r.to_json().to_string().to_lowercase().contains(&needle))
            .collect()
    }

    /// Render the visible records as text cells.
    pub fn listing(&self, data: &Aggregate) -> Listing {
        let config = self.config();
        let rows = self
            .visible(data)
            .into_iter()
            .map(|record| {
                let json = record.to_json();
                Row {
                    id: record.id().clone(),
                    cells: config.fields.iter().map(|f| render_cell(f, &json)).collect(),
                }
            })
            .collect();
        Listing {
            title: config.title,
            columns: config.fields.iter().map(|f| f.label).collect(),
            rows,
        }
    }

    // -----------------------------------------------------------------------
    // Editor
    // -----------------------------------------------------------------------

    /// Open the editor on an empty form.
    ///
    /// Orders are not created here; they have their own form.
    pub fn open_new(&mut self) -> Result<()> {
        if !self.collection.is_catalog() {
            return Err(Error::Invalid(
                "production orders are created with the order form".to_string(),
            ));
        }
        self.mode = Mode::Editing {
            target: EditTarget::New,
            form: Form::empty(self.collection),
        };
        Ok(())
    }

    /// Open the editor on an existing record.
    pub fn open_edit(&mut self, data: &Aggregate, id: &RecordId) -> Result<()> {
        let record = data.find(self.collection, id).ok_or_else(|| Error::NotFound {
            collection: self.collection,
            id: id.to_string(),
        })?;
        self.mode = Mode::Editing {
            target: EditTarget::Existing(id.clone()),
            form: Form::from_record(&record),
        };
        Ok(())
    }

    /// The open form, if the editor is showing.
    pub fn form_mut(&mut self) -> Option<&mut Form> {
        match &mut self.mode {
            Mode::Editing { form, .. } => Some(form),
            Mode::Listing => None,
        }
    }

    /// Close the editor without writing anything.
    pub fn cancel(&mut self) {
        self.mode = Mode::Listing;
    }

    /// Validate the form and write it.
    ///
    /// On success the editor closes. A blocked save or a repository error
    /// leaves the editor open with the form as typed.
    pub fn save(&mut self, db: &mut Db) -> Result<SaveOutcome> {
        let Mode::Editing { target, form } = &self.mode else {
            return Err(Error::Invalid("no record is being edited".to_string()));
        };

        let saved = match target {
            EditTarget::New => {
                let Some(draft) = form.to_draft() else {
                    return Ok(SaveOutcome::Blocked);
                };
                db.add_item(draft)?
            }
            EditTarget::Existing(id) => {
                let original = db.snapshot().find(self.collection, id).ok_or_else(|| {
                    Error::NotFound {
                        collection: self.collection,
                        id: id.to_string(),
                    }
                })?;
                let Some(record) = form.apply_to(&original) else {
                    return Ok(SaveOutcome::Blocked);
                };
                db.update_item(record.clone())?;
                record
            }
        };

        self.mode = Mode::Listing;
        Ok(SaveOutcome::Saved(saved))
    }

    /// Delete a record after the user confirms.
    ///
    /// A declined confirmation writes nothing.
    pub fn request_delete(
        &mut self,
        db: &mut Db,
        id: &RecordId,
        confirm: &mut impl Confirm,
    ) -> Result<DeleteOutcome> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Declined);
        }
        let removed = db.delete_item(self.collection, id)?;
        Ok(DeleteOutcome::Deleted(removed))
    }
}

fn render_cell(field: &FieldDescriptor, record: &serde_json::Value) -> String {
    let Some(value) = record.get(field.key) else {
        return String::new();
    };
    match (field.kind, value) {
        (_, serde_json::Value::Null) => String::new(),
        (FieldKind::Money, serde_json::Value::Number(n)) => {
            format!("${}", format_amount(n.as_f64().unwrap_or_default()))
        }
        (FieldKind::Date, serde_json::Value::String(s)) => {
            match chrono::DateTime::parse_from_rfc3339(s) {
                Ok(date) => date.with_timezone(&Local).format("%d/%m/%Y").to_string(),
                Err(_) => s.clone(),
            }
        }
        (_, serde_json::Value::String(s)) => s.clone(),
        (_, other) => other.to_string(),
    }
}

/// Whole amounts without a decimal part, others as stored.
pub fn format_amount(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}
