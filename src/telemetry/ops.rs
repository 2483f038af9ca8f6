//! Repository operation span helpers.

use tracing::Span;

use crate::model::Collection;

/// Start a span for one repository mutation.
///
/// The `erp.record.id` field is declared empty and filled once the target
/// record is known via [`record_target`].
pub fn start_mutation_span(collection: Collection, operation: &'static str) -> Span {
    tracing::info_span!(
        "erp.mutation",
        "erp.collection" = %collection,
        "erp.operation" = operation,
        "erp.record.id" = tracing::field::Empty,
    )
}

/// Record the id of the record a mutation touched.
pub fn record_target(span: &Span, id: &str) {
    span.record("erp.record.id", id);
}

/// Record a status change on an order.
///
/// Emits a tracing `info` event scoped to the given span.
pub fn record_status_change(span: &Span, from: &str, to: &str) {
    span.in_scope(|| {
        tracing::info!(from = from, to = to, "status_change");
    });
}
