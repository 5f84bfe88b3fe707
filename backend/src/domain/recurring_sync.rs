//! Recurring order sync engine.
//!
//! Expands recurring order definitions into pending delivery stops on the
//! master schedule of a target date. A run is safe to repeat: orders that
//! already have a stop on the schedule are skipped, and storage constraints
//! back both the one-schedule-per-date and one-stop-per-order rules.
//!
//! Writes are not transactional. The schedule and each stop commit on their
//! own, so a failed run may leave some stops behind; the error reports how
//! many. Re-running the sync fills in whatever is missing.
//!
//! The time budget is checked between orders. A stop write that has started
//! always runs to completion, so a timed-out run reports exactly the stops
//! it committed; the run may overrun its budget by one order's store calls.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    DeliveryStopRepository, DeliveryStopRepositoryError, DispatchScheduleRepository,
    DispatchScheduleRepositoryError, NoOpRecurringSyncMetrics, RecurringOrderRepository,
    RecurringOrderSync, RecurringSyncMetrics, SkipTally, SyncError, SyncRecurringOrdersRequest,
    SyncRecurringOrdersResponse, SyncRunOutcome,
};
use crate::domain::{
    MasterSchedule, NewDeliveryStop, RecurringOrder, ScheduleNumber, recurrence,
    weekday_name,
};

/// Time budget for one run unless configured otherwise.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(30);

/// What happened to a single qualifying order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopOutcome {
    Created,
    AlreadyPresent,
    MissingCustomer,
    Failed,
}

impl From<&SyncError> for SyncRunOutcome {
    fn from(error: &SyncError) -> Self {
        match error {
            SyncError::Validation { .. } => Self::Validation,
            SyncError::Lookup { .. } => Self::Lookup,
            SyncError::Store { .. } => Self::Store,
            SyncError::Timeout { .. } => Self::Timeout,
        }
    }
}

fn schedule_store_error(error: DispatchScheduleRepositoryError) -> SyncError {
    SyncError::store(error.to_string(), 0_u32)
}

/// Sync engine implementing [`RecurringOrderSync`].
pub struct RecurringOrderSyncService<O, S, D> {
    orders: Arc<O>,
    schedules: Arc<S>,
    stops: Arc<D>,
    metrics: Arc<dyn RecurringSyncMetrics>,
    timeout: Duration,
}

impl<O, S, D> RecurringOrderSyncService<O, S, D> {
    /// Create a service with no-op metrics and the default time budget.
    pub fn new(orders: Arc<O>, schedules: Arc<S>, stops: Arc<D>) -> Self {
        Self {
            orders,
            schedules,
            stops,
            metrics: Arc::new(NoOpRecurringSyncMetrics),
            timeout: DEFAULT_SYNC_TIMEOUT,
        }
    }

    /// Record run outcomes through `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn RecurringSyncMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Bound each run by `timeout`, checked between orders.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl<O, S, D> RecurringOrderSyncService<O, S, D>
where
    O: RecurringOrderRepository,
    S: DispatchScheduleRepository,
    D: DeliveryStopRepository,
{
    async fn load_candidates(&self, date: NaiveDate) -> Result<Vec<RecurringOrder>, SyncError> {
        let weekday = date.weekday();
        let orders = self
            .orders
            .list_active_for_weekday(weekday)
            .await
            .map_err(|err| SyncError::lookup(err.to_string()))?;
        let loaded = orders.len();
        let qualifying: Vec<_> = orders
            .into_iter()
            .filter(|order| recurrence::qualifies(order, date))
            .collect();
        debug!(
            %date,
            weekday = weekday_name(weekday),
            loaded,
            qualifying = qualifying.len(),
            "selected recurring orders"
        );
        Ok(qualifying)
    }

    async fn resolve_schedule(&self, date: NaiveDate) -> Result<MasterSchedule, SyncError> {
        if let Some(existing) = self
            .schedules
            .find_by_date(date)
            .await
            .map_err(schedule_store_error)?
        {
            return Ok(existing);
        }

        let number = ScheduleNumber::for_date(date);
        match self.schedules.create(date, &number).await {
            Ok(created) => {
                info!(%date, schedule_id = %created.id, schedule_number = %number, "created dispatch schedule");
                Ok(created)
            }
            Err(DispatchScheduleRepositoryError::Conflict { message }) => {
                debug!(%date, %message, "dispatch schedule created concurrently; re-reading");
                self.schedules
                    .find_by_date(date)
                    .await
                    .map_err(schedule_store_error)?
                    .ok_or_else(|| {
                        SyncError::store(
                            format!("schedule for {date} conflicted on create but is missing on re-read"),
                            0_u32,
                        )
                    })
            }
            Err(other) => Err(schedule_store_error(other)),
        }
    }

    /// Create the stop for one order. `Err` means the store is unreachable
    /// and the batch must stop.
    async fn materialise_stop(
        &self,
        schedule: &MasterSchedule,
        order: &RecurringOrder,
    ) -> Result<StopOutcome, DeliveryStopRepositoryError> {
        let Some(customer) = order.resolved_customer() else {
            warn!(order_id = %order.id, "recurring order has no resolvable customer; skipping");
            return Ok(StopOutcome::MissingCustomer);
        };

        match self
            .stops
            .find_for_recurring_order(schedule.id, order.id)
            .await
        {
            Ok(Some(_)) => return Ok(StopOutcome::AlreadyPresent),
            Ok(None) => {}
            Err(err @ DeliveryStopRepositoryError::Connection { .. }) => return Err(err),
            Err(err) => {
                warn!(order_id = %order.id, error = %err, "delivery stop lookup failed; skipping order");
                return Ok(StopOutcome::Failed);
            }
        }

        let stop = NewDeliveryStop::for_recurring_order(schedule, order, customer);
        match self.stops.create(stop).await {
            Ok(created) => {
                debug!(order_id = %order.id, stop_id = %created.id, "created delivery stop");
                Ok(StopOutcome::Created)
            }
            Err(DeliveryStopRepositoryError::Conflict { .. }) => {
                debug!(order_id = %order.id, "delivery stop created concurrently");
                Ok(StopOutcome::AlreadyPresent)
            }
            Err(err @ DeliveryStopRepositoryError::Connection { .. }) => Err(err),
            Err(err) => {
                warn!(order_id = %order.id, error = %err, "delivery stop insert failed; skipping order");
                Ok(StopOutcome::Failed)
            }
        }
    }

    /// Await a step that commits no stops, failing once `deadline` passes.
    async fn before_deadline<T>(
        &self,
        deadline: Instant,
        step: impl Future<Output = Result<T, SyncError>>,
    ) -> Result<T, SyncError> {
        tokio::time::timeout_at(deadline, step)
            .await
            .unwrap_or_else(|_| Err(SyncError::timeout(self.timeout, 0_u32)))
    }

    async fn run(&self, date: NaiveDate) -> Result<SyncRecurringOrdersResponse, SyncError> {
        let deadline = Instant::now() + self.timeout;
        let candidates = self
            .before_deadline(deadline, self.load_candidates(date))
            .await?;
        let schedule = self
            .before_deadline(deadline, self.resolve_schedule(date))
            .await?;

        let mut created = 0_u32;
        let mut skipped = SkipTally::default();
        for order in &candidates {
            if Instant::now() >= deadline {
                return Err(SyncError::timeout(self.timeout, created));
            }
            match self.materialise_stop(&schedule, order).await {
                Ok(StopOutcome::Created) => created = created.saturating_add(1),
                Ok(StopOutcome::AlreadyPresent) => {
                    skipped.already_present = skipped.already_present.saturating_add(1);
                }
                Ok(StopOutcome::MissingCustomer) => {
                    skipped.missing_customer = skipped.missing_customer.saturating_add(1);
                }
                Ok(StopOutcome::Failed) => skipped.failed = skipped.failed.saturating_add(1),
                Err(err) => return Err(SyncError::store(err.to_string(), created)),
            }
        }

        Ok(SyncRecurringOrdersResponse {
            schedule_id: schedule.id,
            schedule_number: schedule.schedule_number,
            schedule_date: schedule.schedule_date,
            stops_created: created,
            skipped,
        })
    }

    async fn record(&self, outcome: SyncRunOutcome, stops_created: u32) {
        if let Err(err) = self.metrics.record_run(outcome, stops_created).await {
            warn!(error = %err, "failed to record recurring sync metrics");
        }
    }
}

#[async_trait]
impl<O, S, D> RecurringOrderSync for RecurringOrderSyncService<O, S, D>
where
    O: RecurringOrderRepository,
    S: DispatchScheduleRepository,
    D: DeliveryStopRepository,
{
    async fn sync(
        &self,
        request: SyncRecurringOrdersRequest,
    ) -> Result<SyncRecurringOrdersResponse, SyncError> {
        let date = request.target_date;
        let result = self.run(date).await;

        match &result {
            Ok(response) => {
                info!(
                    %date,
                    schedule_id = %response.schedule_id,
                    stops_created = response.stops_created,
                    already_present = response.skipped.already_present,
                    missing_customer = response.skipped.missing_customer,
                    failed = response.skipped.failed,
                    "recurring order sync finished"
                );
                self.record(SyncRunOutcome::Success, response.stops_created)
                    .await;
            }
            Err(err) => {
                error!(%date, error = %err, stops_created = err.stops_created(), "recurring order sync failed");
                self.record(SyncRunOutcome::from(err), err.stops_created())
                    .await;
            }
        }
        result
    }

    async fn preview(&self, target_date: NaiveDate) -> Result<Vec<RecurringOrder>, SyncError> {
        tokio::time::timeout(self.timeout, self.load_candidates(target_date))
            .await
            .unwrap_or_else(|_| Err(SyncError::timeout(self.timeout, 0_u32)))
    }
}

#[cfg(test)]
#[path = "recurring_sync_tests.rs"]
mod tests;
