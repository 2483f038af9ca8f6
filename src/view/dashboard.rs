//! Dashboard figures, recomputed from a snapshot on every render.

use serde::Serialize;

use crate::model::{Aggregate, OrderStatus, RecordId};

/// Shown when an order points at a record that no longer exists.
pub const UNKNOWN_LABEL: &str = "Desconocido";

/// How many orders the "latest orders" panel shows.
pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentOrder {
    pub id: RecordId,
    pub article: String,
    pub workshop: String,
    pub quantity: u32,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_orders: usize,
    /// Pending plus in progress.
    pub active_orders: usize,
    pub completed_orders: usize,
    pub article_count: usize,
    pub workshop_count: usize,
    /// Chart series: pending, in progress, completed.
    pub by_status: Vec<StatusCount>,
    /// First orders of the list, which is newest first.
    pub recent: Vec<RecentOrder>,
}

pub fn dashboard(data: &Aggregate) -> DashboardStats {
    let count = |status: OrderStatus| data.production.iter().filter(|o| o.status == status).count();

    let by_status = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Completed,
    ]
    .into_iter()
    .map(|status| StatusCount {
        status,
        count: count(status),
    })
    .collect();

    let recent = data
        .production
        .iter()
        .take(RECENT_LIMIT)
        .map(|order| RecentOrder {
            id: order.id.clone(),
            article: data
                .article(&order.article_id)
                .map_or(UNKNOWN_LABEL, |a| a.name.as_str())
                .to_string(),
            workshop: data
                .workshop(&order.workshop_id)
                .map_or(UNKNOWN_LABEL, |w| w.name.as_str())
                .to_string(),
            quantity: order.quantity,
            status: order.status,
        })
        .collect();

    DashboardStats {
        total_orders: data.production.len(),
        active_orders: data.production.iter().filter(|o| o.status.is_active()).count(),
        completed_orders: count(OrderStatus::Completed),
        article_count: data.articles.len(),
        workshop_count: data.workshops.len(),
        by_status,
        recent,
    }
}
