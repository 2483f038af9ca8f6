//! The "new production order" form.

use std::time::Duration;

use super::table::format_amount;
use crate::db::Db;
use crate::error::Result;
use crate::model::{Aggregate, NewOrder, ProductionOrder, RecordId};

/// One entry of a select box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: RecordId,
    pub label: String,
}

pub fn workshop_options(data: &Aggregate) -> Vec<SelectOption> {
    data.workshops
        .iter()
        .map(|w| SelectOption {
            value: w.id.clone(),
            label: w.name.clone(),
        })
        .collect()
}

pub fn article_options(data: &Aggregate) -> Vec<SelectOption> {
    data.articles
        .iter()
        .map(|a| SelectOption {
            value: a.id.clone(),
            label: format!("{} - {}", a.sku, a.name),
        })
        .collect()
}

pub fn task_options(data: &Aggregate) -> Vec<SelectOption> {
    data.tasks
        .iter()
        .map(|t| SelectOption {
            value: t.id.clone(),
            label: format!("{} (${})", t.name, format_amount(t.cost_per_unit)),
        })
        .collect()
}

pub fn process_options(data: &Aggregate) -> Vec<SelectOption> {
    data.processes
        .iter()
        .map(|p| SelectOption {
            value: p.id.clone(),
            label: p.name.clone(),
        })
        .collect()
}

/// Raw form input, as typed or selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub workshop_id: String,
    pub article_id: String,
    pub task_id: String,
    pub process_id: String,
    pub quantity: String,
    pub notes: String,
}

impl OrderForm {
    /// The order to create, or `None` while workshop, article or a positive
    /// quantity is missing.
    ///
    /// Task and process pass through as selected, empty included.
    pub fn validate(&self) -> Option<NewOrder> {
        let workshop = self.workshop_id.trim();
        let article = self.article_id.trim();
        if workshop.is_empty() || article.is_empty() {
            return None;
        }
        let quantity: u32 = self.quantity.trim().parse().ok().filter(|&q| q > 0)?;

        Some(
            NewOrder::new(
                workshop,
                article,
                self.task_id.trim(),
                self.process_id.trim(),
                quantity,
            )
            .notes(self.notes.clone()),
        )
    }

    /// Wait out `delay`, then create the order.
    ///
    /// Returns `Ok(None)` without waiting when the form is incomplete. The
    /// pause is not cancellable once started.
    pub async fn submit(&self, db: &mut Db, delay: Duration) -> Result<Option<ProductionOrder>> {
        let Some(new) = self.validate() else {
            return Ok(None);
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        db.add_order(new).map(Some)
    }
}
