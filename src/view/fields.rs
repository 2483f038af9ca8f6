//! Per-collection field tables and the editor's form state.
//!
//! One generic editor serves every collection. Which fields it shows, which
//! it lets the user change and which must be filled in all come from the
//! static tables here.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::*;

/// How a field is rendered and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Id,
    Text,
    /// Whole number.
    Number,
    /// Decimal amount shown with a `$` prefix.
    Money,
    Status,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Key in the persisted record.
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub editable: bool,
    pub required: bool,
}

const fn field(key: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind,
        editable: true,
        required,
    }
}

const fn read_only(key: &'static str, label: &'static str, kind: FieldKind) -> FieldDescriptor {
    FieldDescriptor {
        key,
        label,
        kind,
        editable: false,
        required: false,
    }
}

/// Title and columns of one collection's table.
#[derive(Debug)]
pub struct CollectionView {
    pub collection: Collection,
    pub title: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl CollectionView {
    pub fn field(&self, key: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn editable_fields(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter().filter(|f| f.editable)
    }
}

static WORKSHOPS: CollectionView = CollectionView {
    collection: Collection::Workshops,
    title: "Talleres",
    fields: &[
        field("name", "Nombre", FieldKind::Text, true),
        field("location", "Ubicación", FieldKind::Text, false),
        field("contact", "Contacto", FieldKind::Text, false),
    ],
};

static ARTICLES: CollectionView = CollectionView {
    collection: Collection::Articles,
    title: "Artículos",
    fields: &[
        field("name", "Nombre", FieldKind::Text, true),
        field("sku", "SKU", FieldKind::Text, true),
        field("category", "Categoría", FieldKind::Text, true),
    ],
};

static TASKS: CollectionView = CollectionView {
    collection: Collection::Tasks,
    title: "Tareas",
    fields: &[
        field("name", "Nombre", FieldKind::Text, true),
        field("costPerUnit", "Costo por unidad", FieldKind::Money, true),
    ],
};

static PROCESSES: CollectionView = CollectionView {
    collection: Collection::Processes,
    title: "Procesos",
    fields: &[
        field("name", "Nombre", FieldKind::Text, true),
        field("description", "Descripción", FieldKind::Text, false),
    ],
};

// Only the status of an existing order can be changed here.
static PRODUCTION: CollectionView = CollectionView {
    collection: Collection::Production,
    title: "Ordenes de Producción",
    fields: &[
        read_only("id", "ID", FieldKind::Id),
        field("status", "Estado", FieldKind::Status, true),
        read_only("quantity", "Cantidad", FieldKind::Number),
        read_only("date", "Fecha", FieldKind::Date),
    ],
};

/// The field table for `collection`.
pub fn view_of(collection: Collection) -> &'static CollectionView {
    match collection {
        Collection::Workshops => &WORKSHOPS,
        Collection::Articles => &ARTICLES,
        Collection::Tasks => &TASKS,
        Collection::Processes => &PROCESSES,
        Collection::Production => &PRODUCTION,
    }
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Raw text the user typed into the editor, keyed by field.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    collection: Collection,
    values: BTreeMap<&'static str, String>,
}

impl Form {
    /// An empty form for a new record.
    pub fn empty(collection: Collection) -> Self {
        Self {
            collection,
            values: BTreeMap::new(),
        }
    }

    /// A form prefilled with the editable fields of `record`.
    pub fn from_record(record: &Record) -> Self {
        let collection = record.collection();
        let json = record.to_json();
        let values = view_of(collection)
            .editable_fields()
            .filter_map(|f| json.get(f.key).and_then(plain_text).map(|v| (f.key, v)))
            .collect();
        Self { collection, values }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set one field. Only fields the editor shows as editable are accepted.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let descriptor = view_of(self.collection).field(key).ok_or_else(|| {
            Error::Invalid(format!("{} has no field {key}", self.collection))
        })?;
        if !descriptor.editable {
            return Err(Error::Invalid(format!(
                "{key} cannot be edited on {}",
                self.collection
            )));
        }
        self.values.insert(descriptor.key, value.into());
        Ok(())
    }

    /// Presence check: every required field is non-blank and every numeric
    /// field parses.
    pub fn is_complete(&self) -> bool {
        view_of(self.collection).editable_fields().all(|f| {
            let value = self.text(f.key);
            if value.is_empty() {
                return !f.required;
            }
            match f.kind {
                FieldKind::Money => parse_amount(value).is_some(),
                FieldKind::Number => value.parse::<u32>().is_ok(),
                FieldKind::Status => value.parse::<OrderStatus>().is_ok(),
                _ => true,
            }
        })
    }

    /// Fields for a new catalog record, or `None` if the form is incomplete.
    pub fn to_draft(&self) -> Option<Draft> {
        if !self.is_complete() {
            return None;
        }
        let draft = match self.collection {
            Collection::Workshops => Draft::Workshop(NewWorkshop {
                name: self.owned("name"),
                location: self.optional("location"),
                contact: self.optional("contact"),
            }),
            Collection::Articles => Draft::Article(NewArticle {
                name: self.owned("name"),
                sku: self.owned("sku"),
                category: self.owned("category"),
            }),
            Collection::Tasks => Draft::Task(NewTask {
                name: self.owned("name"),
                cost_per_unit: parse_amount(self.text("costPerUnit"))?,
            }),
            Collection::Processes => Draft::Process(NewProcess {
                name: self.owned("name"),
                description: self.optional("description"),
            }),
            Collection::Production => return None,
        };
        Some(draft)
    }

    /// The edited version of `original`, or `None` if the form is incomplete.
    ///
    /// For orders only the status is taken from the form; every other field
    /// keeps its stored value.
    pub fn apply_to(&self, original: &Record) -> Option<Record> {
        if original.collection() != self.collection {
            return None;
        }
        if let Record::Production(order) = original {
            if !self.is_complete() {
                return None;
            }
            let mut order = order.clone();
            if let Some(status) = self.get("status") {
                order.status = status.parse().ok()?;
            }
            return Some(Record::Production(order));
        }

        let id = original.id().clone();
        Some(match self.to_draft()? {
            Draft::Workshop(d) => Workshop::from_draft(id, d).into_record(),
            Draft::Article(d) => Article::from_draft(id, d).into_record(),
            Draft::Task(d) => Task::from_draft(id, d).into_record(),
            Draft::Process(d) => Process::from_draft(id, d).into_record(),
        })
    }

    fn text(&self, key: &str) -> &str {
        self.get(key).map(str::trim).unwrap_or("")
    }

    fn owned(&self, key: &str) -> String {
        self.text(key).to_string()
    }

    fn optional(&self, key: &str) -> Option<String> {
        Some(self.text(key)).filter(|s| !s.is_empty()).map(str::to_string)
    }
}

/// Parse a non-negative decimal amount, tolerating a leading `$`.
pub fn parse_amount(s: &str) -> Option<f64> {
    let n: f64 = s.trim().trim_start_matches('$').trim().parse().ok()?;
    (n.is_finite() && n >= 0.0).then_some(n)
}

fn plain_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
