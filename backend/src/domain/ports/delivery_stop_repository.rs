//! Driven port for delivery stop storage.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{DeliveryStop, NewDeliveryStop, RecurringOrderId, ScheduleId};

define_port_error! {
    /// Errors raised by delivery stop adapters.
    pub enum DeliveryStopRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "delivery stop store connection failed: {message}",
        /// The store rejected or failed the operation.
        Query { message: String } => "delivery stop store query failed: {message}",
        /// A stop for the same schedule and recurring order already exists.
        Conflict { message: String } => "delivery stop already exists: {message}",
    }
}

/// Read/write access to delivery stops.
///
/// Storage must enforce uniqueness of `(master_schedule_id,
/// recurring_order_id)` for non-null recurring order references.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryStopRepository: Send + Sync {
    /// Find the stop a recurring order already contributed to a schedule.
    async fn find_for_recurring_order(
        &self,
        schedule_id: ScheduleId,
        recurring_order_id: RecurringOrderId,
    ) -> Result<Option<DeliveryStop>, DeliveryStopRepositoryError>;

    /// Insert a stop, committing it independently of any other insert.
    async fn create(&self, stop: NewDeliveryStop)
    -> Result<DeliveryStop, DeliveryStopRepositoryError>;

    /// List the stops of a schedule in creation order.
    async fn list_for_schedule(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<DeliveryStop>, DeliveryStopRepositoryError>;
}
