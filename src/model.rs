//! Core data model.
//!
//! Five collections live side by side in one [`Aggregate`]: workshops,
//! articles, tasks, processes and production orders. Orders point at the
//! other four through plain ids (soft references); nothing checks that the
//! target still exists.

pub mod order;
pub mod seed;
pub mod wire;

pub use order::{NewOrder, OrderStatus, ProductionOrder};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Opaque record identifier, unique within its own collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Draw a fresh random id (12 hex chars of a v4 uuid).
    pub fn generate() -> Self {
        let mut s = Uuid::new_v4().simple().to_string();
        s.truncate(12);
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// One of the five named lists in the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Workshops,
    Articles,
    Tasks,
    Processes,
    Production,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Workshops,
        Collection::Articles,
        Collection::Tasks,
        Collection::Processes,
        Collection::Production,
    ];

    /// Key of this collection in the persisted aggregate.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Workshops => "workshops",
            Collection::Articles => "articles",
            Collection::Tasks => "tasks",
            Collection::Processes => "processes",
            Collection::Production => "production",
        }
    }

    /// Catalog collections go through the generic add path; production
    /// orders have their own.
    pub fn is_catalog(self) -> bool {
        !matches!(self, Collection::Production)
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.key())
    }
}

impl std::str::FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "workshops" | "workshop" => Ok(Collection::Workshops),
            "articles" | "article" => Ok(Collection::Articles),
            "tasks" | "task" => Ok(Collection::Tasks),
            "processes" | "process" => Ok(Collection::Processes),
            "production" | "orders" | "order" => Ok(Collection::Production),
            other => Err(Error::Invalid(format!("unknown collection: {other}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workshop {
    pub id: RecordId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: RecordId,
    pub name: String,
    pub sku: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub name: String,
    #[serde(serialize_with = "wire::amount")]
    pub cost_per_unit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub id: RecordId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fields of a workshop before it has an id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewWorkshop {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewArticle {
    pub name: String,
    pub sku: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub name: String,
    pub cost_per_unit: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewProcess {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A record type stored in one of the four catalog collections.
///
/// Lets the repository run one generic add/update/delete over all of them.
pub trait CatalogEntity: Clone + Serialize {
    /// The record's fields minus its id.
    type Draft;

    const COLLECTION: Collection;

    fn id(&self) -> &RecordId;

    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;

    fn items(data: &Aggregate) -> &Vec<Self>;

    fn items_mut(data: &mut Aggregate) -> &mut Vec<Self>;

    fn into_record(self) -> Record;

    /// Reject field values the stored aggregate cannot hold.
    fn validate(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl CatalogEntity for Workshop {
    type Draft = NewWorkshop;
    const COLLECTION: Collection = Collection::Workshops;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: NewWorkshop) -> Self {
        Self {
            id,
            name: draft.name,
            location: draft.location,
            contact: draft.contact,
        }
    }

    fn items(data: &Aggregate) -> &Vec<Self> {
        &data.workshops
    }

    fn items_mut(data: &mut Aggregate) -> &mut Vec<Self> {
        &mut data.workshops
    }

    fn into_record(self) -> Record {
        Record::Workshop(self)
    }
}

impl CatalogEntity for Article {
    type Draft = NewArticle;
    const COLLECTION: Collection = Collection::Articles;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: NewArticle) -> Self {
        Self {
            id,
            name: draft.name,
            sku: draft.sku,
            category: draft.category,
        }
    }

    fn items(data: &Aggregate) -> &Vec<Self> {
        &data.articles
    }

    fn items_mut(data: &mut Aggregate) -> &mut Vec<Self> {
        &mut data.articles
    }

    fn into_record(self) -> Record {
        Record::Article(self)
    }
}

impl CatalogEntity for Task {
    type Draft = NewTask;
    const COLLECTION: Collection = Collection::Tasks;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: NewTask) -> Self {
        Self {
            id,
            name: draft.name,
            cost_per_unit: draft.cost_per_unit,
        }
    }

    fn items(data: &Aggregate) -> &Vec<Self> {
        &data.tasks
    }

    fn items_mut(data: &mut Aggregate) -> &mut Vec<Self> {
        &mut data.tasks
    }

    fn into_record(self) -> Record {
        Record::Task(self)
    }

    // JSON has no NaN or infinity; serde_json would write them as null.
    fn validate(&self) -> Result<(), Error> {
        if !self.cost_per_unit.is_finite() || self.cost_per_unit < 0.0 {
            return Err(Error::Invalid(format!(
                "cost per unit must be a finite, non-negative amount: {}",
                self.cost_per_unit
            )));
        }
        Ok(())
    }
}

impl CatalogEntity for Process {
    type Draft = NewProcess;
    const COLLECTION: Collection = Collection::Processes;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: NewProcess) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
        }
    }

    fn items(data: &Aggregate) -> &Vec<Self> {
        &data.processes
    }

    fn items_mut(data: &mut Aggregate) -> &mut Vec<Self> {
        &mut data.processes
    }

    fn into_record(self) -> Record {
        Record::Process(self)
    }
}

// ---------------------------------------------------------------------------
// Tagged unions for the generic editor
// ---------------------------------------------------------------------------

/// Any stored record, tagged by its shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Workshop(Workshop),
    Article(Article),
    Task(Task),
    Process(Process),
    Production(ProductionOrder),
}

impl Record {
    pub fn id(&self) -> &RecordId {
        match self {
            Record::Workshop(r) => &r.id,
            Record::Article(r) => &r.id,
            Record::Task(r) => &r.id,
            Record::Process(r) => &r.id,
            Record::Production(r) => &r.id,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Record::Workshop(_) => Collection::Workshops,
            Record::Article(_) => Collection::Articles,
            Record::Task(_) => Collection::Tasks,
            Record::Process(_) => Collection::Processes,
            Record::Production(_) => Collection::Production,
        }
    }

    /// The record as it appears in the persisted aggregate.
    pub fn to_json(&self) -> serde_json::Value {
        // Plain structs with string keys always serialize.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Fields for a new catalog record, tagged by collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    Workshop(NewWorkshop),
    Article(NewArticle),
    Task(NewTask),
    Process(NewProcess),
}

impl Draft {
    pub fn collection(&self) -> Collection {
        match self {
            Draft::Workshop(_) => Collection::Workshops,
            Draft::Article(_) => Collection::Articles,
            Draft::Task(_) => Collection::Tasks,
            Draft::Process(_) => Collection::Processes,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// The whole dataset. All five collections always exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub workshops: Vec<Workshop>,
    pub articles: Vec<Article>,
    pub tasks: Vec<Task>,
    pub processes: Vec<Process>,
    pub production: Vec<ProductionOrder>,
}

impl Aggregate {
    pub fn workshop(&self, id: &RecordId) -> Option<&Workshop> {
        self.workshops.iter().find(|w| &w.id == id)
    }

    pub fn article(&self, id: &RecordId) -> Option<&Article> {
        self.articles.iter().find(|a| &a.id == id)
    }

    pub fn task(&self, id: &RecordId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn process(&self, id: &RecordId) -> Option<&Process> {
        self.processes.iter().find(|p| &p.id == id)
    }

    pub fn order(&self, id: &RecordId) -> Option<&ProductionOrder> {
        self.production.iter().find(|o| &o.id == id)
    }

    /// Every record of one collection, in stored order.
    pub fn records(&self, collection: Collection) -> Vec<Record> {
        match collection {
            Collection::Workshops => self.workshops.iter().cloned().map(Record::Workshop).collect(),
            Collection::Articles => self.articles.iter().cloned().map(Record::Article).collect(),
            Collection::Tasks => self.tasks.iter().cloned().map(Record::Task).collect(),
            Collection::Processes => self.processes.iter().cloned().map(Record::Process).collect(),
            Collection::Production => {
                self.production.iter().cloned().map(Record::Production).collect()
            }
        }
    }

    /// First record with the given id in one collection.
    pub fn find(&self, collection: Collection, id: &RecordId) -> Option<Record> {
        match collection {
            Collection::Workshops => self.workshop(id).cloned().map(Record::Workshop),
            Collection::Articles => self.article(id).cloned().map(Record::Article),
            Collection::Tasks => self.task(id).cloned().map(Record::Task),
            Collection::Processes => self.process(id).cloned().map(Record::Process),
            Collection::Production => self.order(id).cloned().map(Record::Production),
        }
    }

    pub fn contains_id(&self, collection: Collection, id: &RecordId) -> bool {
        self.find(collection, id).is_some()
    }

    pub fn len(&self, collection: Collection) -> usize {
        match collection {
            Collection::Workshops => self.workshops.len(),
            Collection::Articles => self.articles.len(),
            Collection::Tasks => self.tasks.len(),
            Collection::Processes => self.processes.len(),
            Collection::Production => self.production.len(),
        }
    }

    /// Draw ids until one is free in `collection`.
    pub(crate) fn fresh_id(&self, collection: Collection) -> RecordId {
        loop {
            let id = RecordId::generate();
            if !self.contains_id(collection, &id) {
                return id;
            }
        }
    }
}
