//! Production orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;
use crate::error::Error;

/// Lifecycle state of a production order.
///
/// Persisted as the shop floor's own labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "Pendiente")]
    Pending,
    #[serde(rename = "En Proceso")]
    InProgress,
    #[serde(rename = "Completado")]
    Completed,
    #[serde(rename = "Cancelado")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Label shown to users and written to storage.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pendiente",
            OrderStatus::InProgress => "En Proceso",
            OrderStatus::Completed => "Completado",
            OrderStatus::Cancelled => "Cancelado",
        }
    }

    /// Pending and in-progress orders still need work.
    pub fn is_active(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::InProgress)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = Error;

    /// Accepts the stored label or an English name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_lowercase();
        match norm.as_str() {
            "pendiente" | "pending" => Ok(OrderStatus::Pending),
            "en proceso" | "in_progress" | "in-progress" | "inprogress" => {
                Ok(OrderStatus::InProgress)
            }
            "completado" | "completed" => Ok(OrderStatus::Completed),
            "cancelado" | "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(Error::Invalid(format!("unknown order status: {s}"))),
        }
    }
}

/// An order for a workshop to produce a quantity of one article.
///
/// The four `*_id` fields are soft references: they may point at records
/// that were deleted or never existed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionOrder {
    pub id: RecordId,
    /// Creation time. Set once by the repository.
    #[serde(with = "super::wire::date_millis")]
    pub date: DateTime<Utc>,
    pub workshop_id: RecordId,
    pub article_id: RecordId,
    pub process_id: RecordId,
    pub task_id: RecordId,
    pub quantity: u32,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Parameters for creating a production order.
///
/// Carries no id, date or status: the repository assigns all three.
/// Extra keys in deserialized input (a `status`, say) are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub workshop_id: RecordId,
    pub article_id: RecordId,
    pub task_id: RecordId,
    pub process_id: RecordId,
    pub quantity: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewOrder {
    pub fn new(
        workshop_id: impl Into<RecordId>,
        article_id: impl Into<RecordId>,
        task_id: impl Into<RecordId>,
        process_id: impl Into<RecordId>,
        quantity: u32,
    ) -> Self {
        Self {
            workshop_id: workshop_id.into(),
            article_id: article_id.into(),
            task_id: task_id.into(),
            process_id: process_id.into(),
            quantity,
            notes: None,
        }
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = if notes.trim().is_empty() {
            None
        } else {
            Some(notes)
        };
        self
    }
}
