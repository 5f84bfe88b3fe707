//! Domain types, services and ports for recurring dispatch.
//!
//! Purpose: keep the scheduling rules and the sync engine independent of
//! HTTP, Diesel and the clock so they can be driven from the server, the
//! cron CLI and tests alike.
//!
//! Public surface:
//! - Identifiers and records: [`RecurringOrder`], [`MasterSchedule`],
//!   [`DeliveryStop`], [`CustomerSummary`].
//! - [`recurrence`]: frequency qualification rules.
//! - [`RecurringOrderSyncService`]: the sync engine.
//! - [`DispatchScheduleQueryService`]: schedule read model.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic error payload.

pub mod customer;
pub mod dispatch;
pub mod dispatch_schedule_query;
pub mod error;
pub mod ids;
pub mod ports;
pub mod recurrence;
pub mod recurring_order;
pub mod recurring_sync;
pub mod trace_id;

pub use self::customer::CustomerSummary;
pub use self::dispatch::{
    DeliveryStop, MasterSchedule, NewDeliveryStop, ParseStatusError, ScheduleNumber,
    ScheduleStatus, ScheduleWithStops, StopStatus,
};
pub use self::dispatch_schedule_query::DispatchScheduleQueryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{CustomerId, DeliveryStopId, RecurringOrderId, ScheduleId};
pub use self::recurring_order::{Frequency, RecurringOrder, parse_preferred_day, weekday_name};
pub use self::recurring_sync::{DEFAULT_SYNC_TIMEOUT, RecurringOrderSyncService};
pub use self::trace_id::TraceId;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Convenient result alias for services that report [`Error`].
pub type ApiResult<T> = Result<T, Error>;
