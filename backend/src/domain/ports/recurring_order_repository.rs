//! Driven port for reading recurring order definitions.

use async_trait::async_trait;
use chrono::Weekday;

use super::define_port_error;
use crate::domain::RecurringOrder;

define_port_error! {
    /// Errors raised by recurring order registry adapters.
    pub enum RecurringOrderRepositoryError {
        /// The registry could not be reached.
        Connection { message: String } => "recurring order registry connection failed: {message}",
        /// The registry rejected or failed the query.
        Query { message: String } => "recurring order registry query failed: {message}",
    }
}

/// Read access to the recurring order registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecurringOrderRepository: Send + Sync {
    /// Load every active order whose preferred day is `weekday`.
    ///
    /// Each order carries its joined customer summary when the customer
    /// reference resolves.
    async fn list_active_for_weekday(
        &self,
        weekday: Weekday,
    ) -> Result<Vec<RecurringOrder>, RecurringOrderRepositoryError>;
}
