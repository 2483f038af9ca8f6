//! Metric instrument factories for rotten-erp.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"rotten-erp"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

/// Returns the shared meter for rotten-erp instruments.
fn meter() -> Meter {
    opentelemetry::global::meter("rotten-erp")
}

/// Counter: full-aggregate writes to the key-value store.
/// Labels: `key`.
pub fn store_writes() -> Counter<u64> {
    meter()
        .u64_counter("erp.store.writes")
        .with_description("Number of aggregate writes")
        .build()
}

/// Histogram: size of each serialized aggregate.
pub fn store_write_bytes() -> Histogram<u64> {
    meter()
        .u64_histogram("erp.store.write_bytes")
        .with_description("Serialized aggregate size per write")
        .with_unit("By")
        .build()
}

/// Counter: record mutations through the repository.
/// Labels: `collection`, `operation` ("add" | "update" | "delete"),
/// `result` ("ok" | "not_found").
pub fn record_mutations() -> Counter<u64> {
    meter()
        .u64_counter("erp.records.mutations")
        .with_description("Number of record mutations")
        .build()
}

/// Counter: production orders created.
/// Labels: `workshop_id`.
pub fn orders_created() -> Counter<u64> {
    meter()
        .u64_counter("erp.orders.created")
        .with_description("Number of production orders created")
        .build()
}
