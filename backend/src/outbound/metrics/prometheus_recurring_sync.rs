//! Prometheus adapter for recurring sync run metrics.
//!
//! Metrics are registered on the registry shared with the HTTP middleware so
//! they appear on `/metrics`.

use async_trait::async_trait;
use prometheus::{Counter, CounterVec, Opts, Registry};

use crate::domain::ports::{RecurringSyncMetrics, RecurringSyncMetricsError, SyncRunOutcome};

/// Prometheus-backed sync run recorder.
///
/// - `recurring_sync_runs_total{outcome}`: one increment per run, labelled
///   `success`, `validation`, `lookup`, `store` or `timeout`.
/// - `recurring_sync_stops_created_total`: stops committed, including those
///   committed by runs that later failed.
pub struct PrometheusRecurringSyncMetrics {
    runs_total: CounterVec,
    stops_created_total: Counter,
}

impl PrometheusRecurringSyncMetrics {
    /// Create and register the counters.
    ///
    /// # Errors
    ///
    /// Returns an error if a metric with the same name is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let runs_total = CounterVec::new(
            Opts::new("recurring_sync_runs_total", "Recurring sync runs by outcome"),
            &["outcome"],
        )?;
        let stops_created_total = Counter::new(
            "recurring_sync_stops_created_total",
            "Delivery stops created by recurring sync",
        )?;
        registry.register(Box::new(runs_total.clone()))?;
        registry.register(Box::new(stops_created_total.clone()))?;
        Ok(Self {
            runs_total,
            stops_created_total,
        })
    }
}

#[async_trait]
impl RecurringSyncMetrics for PrometheusRecurringSyncMetrics {
    async fn record_run(
        &self,
        outcome: SyncRunOutcome,
        stops_created: u32,
    ) -> Result<(), RecurringSyncMetricsError> {
        self.runs_total
            .with_label_values(&[outcome.as_label()])
            .inc();
        self.stops_created_total.inc_by(f64::from(stops_created));
        Ok(())
    }
}
