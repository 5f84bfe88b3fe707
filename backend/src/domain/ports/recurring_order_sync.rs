//! Driving port for materialising recurring orders into delivery stops.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use super::define_port_error;
use crate::domain::{RecurringOrder, ScheduleId, ScheduleNumber};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

define_port_error! {
    /// Failures surfaced to callers of a sync run.
    ///
    /// Schedule creation conflicts and individual stop failures are recovered
    /// inside the run and never appear here.
    pub enum SyncError {
        /// The target date was missing or malformed; no work was done.
        Validation { message: String } => "invalid sync request: {message}",
        /// Candidate orders could not be loaded; no work was done.
        Lookup { message: String } => "failed to load recurring orders: {message}",
        /// The dispatch store failed after candidates were loaded.
        Store { message: String, stops_created: u32 } =>
            "dispatch store failed after {stops_created} stop(s) were created: {message}",
        /// The run exceeded its time budget. The budget is checked between
        /// orders and stop writes are never cancelled, so `stops_created`
        /// matches what was committed.
        Timeout { timeout: Duration, stops_created: u32 } =>
            "recurring order sync timed out after {timeout:?} with {stops_created} stop(s) created",
    }
}

impl SyncError {
    /// Stops committed before the failure. Inserts are not rolled back.
    #[must_use]
    pub const fn stops_created(&self) -> u32 {
        match self {
            Self::Validation { .. } | Self::Lookup { .. } => 0,
            Self::Store { stops_created, .. } | Self::Timeout { stops_created, .. } => {
                *stops_created
            }
        }
    }
}

/// Request to sync recurring orders for one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncRecurringOrdersRequest {
    /// Date whose schedule receives the generated stops.
    pub target_date: NaiveDate,
}

impl SyncRecurringOrdersRequest {
    /// Build a request for an already-parsed date.
    #[must_use]
    pub const fn new(target_date: NaiveDate) -> Self {
        Self { target_date }
    }

    /// Parse an ISO `YYYY-MM-DD` date supplied by a caller.
    ///
    /// # Examples
    /// ```
    /// use firewood_dispatch::domain::ports::{SyncError, SyncRecurringOrdersRequest};
    ///
    /// let request = SyncRecurringOrdersRequest::from_iso_date("2024-01-15").expect("valid");
    /// assert_eq!(request.target_date.to_string(), "2024-01-15");
    ///
    /// let err = SyncRecurringOrdersRequest::from_iso_date("15/01/2024").expect_err("invalid");
    /// assert!(matches!(err, SyncError::Validation { .. }));
    /// ```
    pub fn from_iso_date(raw: &str) -> Result<Self, SyncError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SyncError::validation("date is required"));
        }
        // chrono accepts single-digit months and days; the wire format does not.
        if trimmed.len() != 10 {
            return Err(SyncError::validation("date must be formatted as YYYY-MM-DD"));
        }
        NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
            .map(Self::new)
            .map_err(|_| SyncError::validation("date must be formatted as YYYY-MM-DD"))
    }
}

/// Orders that qualified but did not produce a stop in this run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipTally {
    /// A stop for the order already existed on the schedule.
    pub already_present: u32,
    /// The order's customer reference did not resolve.
    pub missing_customer: u32,
    /// The store rejected the existence check or insert for the order.
    pub failed: u32,
}

/// Result of a completed sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRecurringOrdersResponse {
    /// Schedule the stops were added to.
    pub schedule_id: ScheduleId,
    /// Human-readable schedule number.
    pub schedule_number: ScheduleNumber,
    /// Date of the schedule.
    pub schedule_date: NaiveDate,
    /// Stops inserted by this run. Zero is a valid result.
    pub stops_created: u32,
    /// Qualifying orders that were skipped, by reason.
    pub skipped: SkipTally,
}

/// Driving port for the recurring order sync engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecurringOrderSync: Send + Sync {
    /// Create the missing stops for every order that qualifies on the
    /// requested date. Safe to re-run.
    async fn sync(
        &self,
        request: SyncRecurringOrdersRequest,
    ) -> Result<SyncRecurringOrdersResponse, SyncError>;

    /// List the orders that qualify on `target_date` without writing.
    async fn preview(&self, target_date: NaiveDate) -> Result<Vec<RecurringOrder>, SyncError>;
}
