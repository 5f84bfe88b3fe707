//! Master schedules and the delivery stops they own.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    CustomerId, CustomerSummary, DeliveryStopId, RecurringOrder, RecurringOrderId, ScheduleId,
};

/// Human-readable schedule sequence number, `DS-<YYYYMMDD>-01`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleNumber(String);

impl ScheduleNumber {
    /// Derive the sequence number for the schedule of `date`.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use firewood_dispatch::domain::ScheduleNumber;
    ///
    /// let date = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
    /// assert_eq!(ScheduleNumber::for_date(date).as_str(), "DS-20240115-01");
    /// ```
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        Self(format!("DS-{}-01", date.format("%Y%m%d")))
    }

    /// Wrap a number loaded from storage.
    #[must_use]
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the number as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ScheduleNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} status: {value}")]
pub struct ParseStatusError {
    kind: &'static str,
    value: String,
}

/// Lifecycle of a master schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    /// Being assembled; stops may still be added.
    Draft,
    /// Handed to drivers.
    Submitted,
}

impl ScheduleStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
        }
    }
}

impl FromStr for ScheduleStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "submitted" => Ok(Self::Submitted),
            other => Err(ParseStatusError {
                kind: "schedule",
                value: other.to_owned(),
            }),
        }
    }
}

/// Lifecycle of a delivery stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopStatus {
    /// Created but not yet assigned.
    Pending,
    /// Assigned to a run.
    Scheduled,
    /// Delivered.
    Completed,
    /// Called off.
    Cancelled,
}

impl StopStatus {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for StopStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "scheduled" => Ok(Self::Scheduled),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseStatusError {
                kind: "stop",
                value: other.to_owned(),
            }),
        }
    }
}

/// The dispatch schedule for a single calendar date.
///
/// At most one schedule exists per date; storage enforces this with a unique
/// constraint on `schedule_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterSchedule {
    /// Schedule identifier.
    pub id: ScheduleId,
    /// Human-readable sequence number.
    pub schedule_number: ScheduleNumber,
    /// Calendar date the schedule covers.
    pub schedule_date: NaiveDate,
    /// Current lifecycle state.
    pub status: ScheduleStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A single delivery to one customer within a master schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStop {
    /// Stop identifier.
    pub id: DeliveryStopId,
    /// Owning schedule.
    pub master_schedule_id: ScheduleId,
    /// Customer being delivered to.
    pub customer_id: Option<CustomerId>,
    /// Customer name captured at creation.
    pub customer_name: String,
    /// Customer address captured at creation.
    pub customer_address: Option<String>,
    /// Customer phone captured at creation.
    pub customer_phone: Option<String>,
    /// What to deliver.
    pub items: String,
    /// Current lifecycle state.
    pub status: StopStatus,
    /// Recurring order that spawned the stop; `None` for manual stops.
    pub recurring_order_id: Option<RecurringOrderId>,
    /// Whether the stop was generated from a recurring order.
    pub is_recurring: bool,
    /// Free-text notes for the driver.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a delivery stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeliveryStop {
    /// Owning schedule.
    pub master_schedule_id: ScheduleId,
    /// Customer being delivered to.
    pub customer_id: CustomerId,
    /// Customer name at creation.
    pub customer_name: String,
    /// Customer address at creation.
    pub customer_address: Option<String>,
    /// Customer phone at creation.
    pub customer_phone: Option<String>,
    /// What to deliver.
    pub items: String,
    /// Initial lifecycle state.
    pub status: StopStatus,
    /// Spawning recurring order.
    pub recurring_order_id: RecurringOrderId,
    /// Always `true` for generated stops.
    pub is_recurring: bool,
    /// Driver notes.
    pub notes: String,
}

impl NewDeliveryStop {
    /// Build the pending stop a recurring order contributes to `schedule`.
    ///
    /// Customer contact details are copied from `customer` so the stop keeps
    /// the values in force on the day it was generated.
    #[must_use]
    pub fn for_recurring_order(
        schedule: &MasterSchedule,
        order: &RecurringOrder,
        customer: &CustomerSummary,
    ) -> Self {
        Self {
            master_schedule_id: schedule.id,
            customer_id: customer.id,
            customer_name: customer.name.clone(),
            customer_address: customer.address.clone(),
            customer_phone: customer.phone.clone(),
            items: order.items.clone(),
            status: StopStatus::Pending,
            recurring_order_id: order.id,
            is_recurring: true,
            notes: format!("Recurring {} order", order.frequency),
        }
    }
}

/// A schedule together with its stops, for read models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWithStops {
    /// The master schedule.
    pub schedule: MasterSchedule,
    /// Stops belonging to the schedule.
    pub stops: Vec<DeliveryStop>,
}
