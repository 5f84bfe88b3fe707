//! Domain port for recording recurring sync run outcomes.
//!
//! Implementations may export to Prometheus or discard everything; the sync
//! service never fails a run because a metric could not be written.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording sync metrics.
    pub enum RecurringSyncMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "recurring sync metrics exporter failed: {message}",
    }
}

/// Outcome label attached to every recorded run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncRunOutcome {
    /// The run completed; some stops may have been skipped.
    Success,
    /// The request was rejected before any work.
    Validation,
    /// Candidate orders could not be loaded.
    Lookup,
    /// The schedule or stop store failed mid-run.
    Store,
    /// The run exceeded its time budget.
    Timeout,
}

impl SyncRunOutcome {
    /// Metric label value.
    #[must_use]
    pub const fn as_label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Validation => "validation",
            Self::Lookup => "lookup",
            Self::Store => "store",
            Self::Timeout => "timeout",
        }
    }
}

/// Metrics recording port for sync runs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecurringSyncMetrics: Send + Sync {
    /// Record one finished run and the stops it committed.
    async fn record_run(
        &self,
        outcome: SyncRunOutcome,
        stops_created: u32,
    ) -> Result<(), RecurringSyncMetricsError>;
}

/// Metrics sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpRecurringSyncMetrics;

#[async_trait]
impl RecurringSyncMetrics for NoOpRecurringSyncMetrics {
    async fn record_run(
        &self,
        _outcome: SyncRunOutcome,
        _stops_created: u32,
    ) -> Result<(), RecurringSyncMetricsError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn no_op_metrics_accept_every_outcome() {
        let metrics = NoOpRecurringSyncMetrics;
        for outcome in [
            SyncRunOutcome::Success,
            SyncRunOutcome::Validation,
            SyncRunOutcome::Lookup,
            SyncRunOutcome::Store,
            SyncRunOutcome::Timeout,
        ] {
            assert!(metrics.record_run(outcome, 3).await.is_ok());
        }
    }

    #[rstest]
    #[case(SyncRunOutcome::Success, "success")]
    #[case(SyncRunOutcome::Timeout, "timeout")]
    fn outcome_labels_are_stable(#[case] outcome: SyncRunOutcome, #[case] label: &str) {
        assert_eq!(outcome.as_label(), label);
    }
}
