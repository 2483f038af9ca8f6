//! Production order operations.
//!
//! Kept apart from the generic catalog path because creation fills in
//! fields the caller never supplies: the id, the creation date and the
//! initial status.

use chrono::{SubsecRound, Utc};
use opentelemetry::KeyValue;

use super::{Db, count_mutation};
use crate::error::{Error, Result};
use crate::model::*;
use crate::telemetry::{metrics, ops};

fn require_quantity(quantity: u32) -> Result<()> {
    if quantity == 0 {
        return Err(Error::Invalid("quantity must be at least 1".to_string()));
    }
    Ok(())
}

fn not_found(id: &RecordId) -> Error {
    Error::NotFound {
        collection: Collection::Production,
        id: id.to_string(),
    }
}

impl Db {
    /// Create an order and put it at the front of the list.
    ///
    /// The order always starts as [`OrderStatus::Pending`]. Referenced
    /// workshop, article, task and process are not checked.
    pub fn add_order(&mut self, new: NewOrder) -> Result<ProductionOrder> {
        require_quantity(new.quantity)?;

        let span = ops::start_mutation_span(Collection::Production, "add");
        let _enter = span.enter();

        let order = self.commit(|data| {
            let order = ProductionOrder {
                id: data.fresh_id(Collection::Production),
                date: Utc::now().trunc_subsecs(3),
                workshop_id: new.workshop_id,
                article_id: new.article_id,
                process_id: new.process_id,
                task_id: new.task_id,
                quantity: new.quantity,
                status: OrderStatus::Pending,
                notes: new.notes,
            };
            data.production.insert(0, order.clone());
            Ok(order)
        })?;

        ops::record_target(&span, order.id.as_str());
        count_mutation(Collection::Production, "add", "ok");
        metrics::orders_created().add(
            1,
            &[KeyValue::new("workshop_id", order.workshop_id.to_string())],
        );
        tracing::info!(
            id = %order.id,
            workshop = %order.workshop_id,
            article = %order.article_id,
            quantity = order.quantity,
            "production order created"
        );
        Ok(order)
    }

    /// Replace the order with the same id, every field included.
    pub fn update_order(&mut self, order: ProductionOrder) -> Result<()> {
        require_quantity(order.quantity)?;

        let span = ops::start_mutation_span(Collection::Production, "update");
        let _enter = span.enter();
        ops::record_target(&span, order.id.as_str());

        let previous = self.commit(|data| {
            let slot = data
                .production
                .iter_mut()
                .find(|o| o.id == order.id)
                .ok_or_else(|| not_found(&order.id))?;
            Ok(std::mem::replace(slot, order.clone()))
        });

        let previous = match previous {
            Ok(previous) => previous,
            Err(e) => {
                if matches!(e, Error::NotFound { .. }) {
                    count_mutation(Collection::Production, "update", "not_found");
                    tracing::warn!(id = %order.id, "order update target missing");
                }
                return Err(e);
            }
        };

        if previous.status != order.status {
            ops::record_status_change(&span, previous.status.label(), order.status.label());
        }
        count_mutation(Collection::Production, "update", "ok");
        Ok(())
    }

    /// Change only the status of an order and return the updated order.
    pub fn set_order_status(&mut self, id: &RecordId, status: OrderStatus) -> Result<ProductionOrder> {
        let mut order = self
            .snapshot()
            .order(id)
            .cloned()
            .ok_or_else(|| not_found(id))?;
        order.status = status;
        self.update_order(order.clone())?;
        Ok(order)
    }

    /// Remove every order with `id`. Returns how many were removed.
    pub fn delete_order(&mut self, id: &RecordId) -> Result<usize> {
        let span = ops::start_mutation_span(Collection::Production, "delete");
        let _enter = span.enter();
        ops::record_target(&span, id.as_str());

        let removed = self.commit(|data| {
            let before = data.production.len();
            data.production.retain(|o| &o.id != id);
            Ok(before - data.production.len())
        })?;

        count_mutation(
            Collection::Production,
            "delete",
            if removed == 0 { "not_found" } else { "ok" },
        );
        tracing::info!(%id, removed, "production orders deleted");
        Ok(removed)
    }
}
