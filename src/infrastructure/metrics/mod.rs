//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - Active WebSocket session gauge
//! - Broadcasts by message kind, and per-recipient deliveries
//! - Forced evictions of stalled sessions
//! - Messages appended to the history store by kind

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Sessions currently registered with the hub
pub static SESSIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("sessions_active", "Number of sessions registered with the hub")
            .namespace("channel_relay"),
    )
    .expect("Failed to create SESSIONS_ACTIVE metric")
});

/// Broadcast requests processed by the hub, by message kind
pub static BROADCASTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("broadcasts_total", "Total number of broadcast requests")
            .namespace("channel_relay"),
        &["kind"],
    )
    .expect("Failed to create BROADCASTS_TOTAL metric")
});

/// Messages successfully placed on a session's outbound queue
pub static DELIVERIES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("deliveries_total", "Total number of messages enqueued to sessions")
            .namespace("channel_relay"),
    )
    .expect("Failed to create DELIVERIES_TOTAL metric")
});

/// Sessions dropped because their outbound queue was full
pub static EVICTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("evictions_total", "Total number of sessions evicted for a full queue")
            .namespace("channel_relay"),
    )
    .expect("Failed to create EVICTIONS_TOTAL metric")
});

/// Messages appended to channel history, by message kind
pub static MESSAGES_STORED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("messages_stored_total", "Total number of messages appended to history")
            .namespace("channel_relay"),
        &["kind"],
    )
    .expect("Failed to create MESSAGES_STORED_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(SESSIONS_ACTIVE.clone()))
        .expect("Failed to register SESSIONS_ACTIVE");
    registry
        .register(Box::new(BROADCASTS_TOTAL.clone()))
        .expect("Failed to register BROADCASTS_TOTAL");
    registry
        .register(Box::new(DELIVERIES_TOTAL.clone()))
        .expect("Failed to register DELIVERIES_TOTAL");
    registry
        .register(Box::new(EVICTIONS_TOTAL.clone()))
        .expect("Failed to register EVICTIONS_TOTAL");
    registry
        .register(Box::new(MESSAGES_STORED_TOTAL.clone()))
        .expect("Failed to register MESSAGES_STORED_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to update the active session gauge
pub fn set_active_sessions(count: usize) {
    SESSIONS_ACTIVE.set(count as i64);
}

/// Helper to record one processed broadcast and its fan-out
pub fn record_broadcast(kind: &str, delivered: usize, evicted: usize) {
    BROADCASTS_TOTAL.with_label_values(&[kind]).inc();
    DELIVERIES_TOTAL.inc_by(delivered as u64);
    EVICTIONS_TOTAL.inc_by(evicted as u64);
}

/// Helper to record a history append
pub fn record_message_stored(kind: &str) {
    MESSAGES_STORED_TOTAL.with_label_values(&[kind]).inc();
}
