//! Driven port for master schedule storage.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::define_port_error;
use crate::domain::{MasterSchedule, ScheduleNumber};

define_port_error! {
    /// Errors raised by dispatch schedule adapters.
    pub enum DispatchScheduleRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "dispatch schedule store connection failed: {message}",
        /// The store rejected or failed the operation.
        Query { message: String } => "dispatch schedule store query failed: {message}",
        /// A schedule for the date already exists.
        Conflict { message: String } => "dispatch schedule already exists: {message}",
    }
}

/// Read/write access to master schedules, one per calendar date.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispatchScheduleRepository: Send + Sync {
    /// Find the schedule for `date`, if one exists.
    async fn find_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<MasterSchedule>, DispatchScheduleRepositoryError>;

    /// Create a draft schedule for `date`.
    ///
    /// Adapters must return [`DispatchScheduleRepositoryError::Conflict`]
    /// when another schedule for the same date already exists.
    async fn create(
        &self,
        date: NaiveDate,
        schedule_number: &ScheduleNumber,
    ) -> Result<MasterSchedule, DispatchScheduleRepositoryError>;
}
