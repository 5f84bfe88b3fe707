//! Driving port for reading a day's schedule and stops.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Error, ScheduleWithStops};

/// Read model over master schedules.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispatchScheduleQuery: Send + Sync {
    /// Load the schedule for `date` together with its stops.
    ///
    /// Returns a `NotFound` error when no schedule exists for the date.
    async fn schedule_for_date(&self, date: NaiveDate) -> Result<ScheduleWithStops, Error>;
}
