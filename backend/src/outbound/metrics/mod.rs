//! Prometheus exporters for domain metrics ports.
//!
//! Compiled only with the `metrics` feature.

mod prometheus_recurring_sync;

pub use prometheus_recurring_sync::PrometheusRecurringSyncMetrics;
