//! Integration tests for telemetry initialization and span helpers.

use rotten_erp::model::Collection;
use rotten_erp::telemetry::{self, TelemetryConfig, metrics, ops};

#[test]
fn telemetry_initializes_without_endpoint() {
    // Only one global subscriber per process; a second init in the same
    // binary returns Err, which is fine here.
    let config = TelemetryConfig {
        endpoint: None,
        service_name: "rotten-erp-test".to_string(),
        log_level: "debug".to_string(),
    };
    if let Ok(guard) = telemetry::init_telemetry(config) {
        assert!(!guard.is_exporting());
        guard.force_flush();
    }
}

#[test]
fn mutation_span_records_target_and_status_change() {
    let span = ops::start_mutation_span(Collection::Production, "update");
    ops::record_target(&span, "o1");
    ops::record_status_change(&span, "En Proceso", "Completado");
}

#[test]
fn instruments_build_without_a_provider() {
    metrics::store_writes().add(1, &[]);
    metrics::store_write_bytes().record(512, &[]);
    metrics::record_mutations().add(1, &[]);
    metrics::orders_created().add(1, &[]);
}

#[test]
fn default_guard_is_inert() {
    let guard = telemetry::TelemetryGuard::default();
    assert!(!guard.is_exporting());
    guard.force_flush();
}
