//! Internal Diesel row structs for the dispatch tables.
//!
//! Rows never leave the persistence layer; repositories convert them into
//! domain records before returning.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    CustomerSummary, DeliveryStop, Frequency, MasterSchedule, NewDeliveryStop, ParseStatusError,
    RecurringOrder, ScheduleNumber, parse_preferred_day,
};

use super::schema::{customers, delivery_stops, dispatch_schedules, recurring_orders};

/// Customer columns needed for stop denormalisation.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = customers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CustomerRow {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl From<CustomerRow> for CustomerSummary {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            address: row.address,
            phone: row.phone,
        }
    }
}

/// Row struct for reading recurring orders.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recurring_orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecurringOrderRow {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub items: String,
    pub frequency: String,
    pub preferred_day: Option<String>,
    pub active_status: bool,
    pub created_at: DateTime<Utc>,
}

impl RecurringOrderRow {
    /// Combine the order with its left-joined customer.
    pub(crate) fn into_domain(self, customer: Option<CustomerRow>) -> RecurringOrder {
        RecurringOrder {
            id: self.id.into(),
            customer_id: self.customer_id.map(Into::into),
            customer: customer.map(Into::into),
            items: self.items,
            frequency: Frequency::parse(&self.frequency),
            preferred_day: self.preferred_day.as_deref().and_then(parse_preferred_day),
            active: self.active_status,
            created_at: self.created_at,
        }
    }
}

/// Row struct for reading master schedules.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = dispatch_schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DispatchScheduleRow {
    pub id: Uuid,
    pub schedule_number: String,
    pub schedule_date: NaiveDate,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DispatchScheduleRow> for MasterSchedule {
    type Error = ParseStatusError;

    fn try_from(row: DispatchScheduleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            schedule_number: ScheduleNumber::from_stored(row.schedule_number),
            schedule_date: row.schedule_date,
            status: row.status.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable struct for new master schedules.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dispatch_schedules)]
pub(crate) struct NewDispatchScheduleRow<'a> {
    pub schedule_number: &'a str,
    pub schedule_date: NaiveDate,
    pub status: &'a str,
}

/// Row struct for reading delivery stops.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = delivery_stops)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeliveryStopRow {
    pub id: Uuid,
    pub master_schedule_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_address: Option<String>,
    pub customer_phone: Option<String>,
    pub items: String,
    pub status: String,
    pub recurring_order_id: Option<Uuid>,
    pub is_recurring: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DeliveryStopRow> for DeliveryStop {
    type Error = ParseStatusError;

    fn try_from(row: DeliveryStopRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            master_schedule_id: row.master_schedule_id.into(),
            customer_id: row.customer_id.map(Into::into),
            customer_name: row.customer_name,
            customer_address: row.customer_address,
            customer_phone: row.customer_phone,
            items: row.items,
            status: row.status.parse()?,
            recurring_order_id: row.recurring_order_id.map(Into::into),
            is_recurring: row.is_recurring,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

/// Insertable struct for new delivery stops.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = delivery_stops)]
pub(crate) struct NewDeliveryStopRow<'a> {
    pub master_schedule_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: &'a str,
    pub customer_address: Option<&'a str>,
    pub customer_phone: Option<&'a str>,
    pub items: &'a str,
    pub status: &'a str,
    pub recurring_order_id: Option<Uuid>,
    pub is_recurring: bool,
    pub notes: Option<&'a str>,
}

impl<'a> From<&'a NewDeliveryStop> for NewDeliveryStopRow<'a> {
    fn from(stop: &'a NewDeliveryStop) -> Self {
        Self {
            master_schedule_id: *stop.master_schedule_id.as_uuid(),
            customer_id: Some(*stop.customer_id.as_uuid()),
            customer_name: stop.customer_name.as_str(),
            customer_address: stop.customer_address.as_deref(),
            customer_phone: stop.customer_phone.as_deref(),
            items: stop.items.as_str(),
            status: stop.status.as_str(),
            recurring_order_id: Some(*stop.recurring_order_id.as_uuid()),
            is_recurring: stop.is_recurring,
            notes: Some(stop.notes.as_str()),
        }
    }
}
