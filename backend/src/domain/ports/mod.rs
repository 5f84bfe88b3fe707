//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod delivery_stop_repository;
mod dispatch_schedule_query;
mod dispatch_schedule_repository;
mod recurring_order_repository;
mod recurring_order_sync;
mod recurring_sync_metrics;

#[cfg(test)]
pub use delivery_stop_repository::MockDeliveryStopRepository;
pub use delivery_stop_repository::{DeliveryStopRepository, DeliveryStopRepositoryError};
#[cfg(test)]
pub use dispatch_schedule_query::MockDispatchScheduleQuery;
pub use dispatch_schedule_query::DispatchScheduleQuery;
#[cfg(test)]
pub use dispatch_schedule_repository::MockDispatchScheduleRepository;
pub use dispatch_schedule_repository::{
    DispatchScheduleRepository, DispatchScheduleRepositoryError,
};
#[cfg(test)]
pub use recurring_order_repository::MockRecurringOrderRepository;
pub use recurring_order_repository::{RecurringOrderRepository, RecurringOrderRepositoryError};
#[cfg(test)]
pub use recurring_order_sync::MockRecurringOrderSync;
pub use recurring_order_sync::{
    RecurringOrderSync, SkipTally, SyncError, SyncRecurringOrdersRequest,
    SyncRecurringOrdersResponse,
};
#[cfg(test)]
pub use recurring_sync_metrics::MockRecurringSyncMetrics;
pub use recurring_sync_metrics::{
    NoOpRecurringSyncMetrics, RecurringSyncMetrics, RecurringSyncMetricsError, SyncRunOutcome,
};
