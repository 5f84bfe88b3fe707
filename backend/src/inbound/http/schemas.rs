//! OpenAPI schemas for dispatch records.
//!
//! Domain records stay free of `ToSchema`; these wrappers mirror their JSON
//! shape for documentation only.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::MasterSchedule`].
#[derive(ToSchema)]
#[schema(as = crate::domain::MasterSchedule)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MasterScheduleSchema {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: String,
    #[schema(example = "DS-20240115-01")]
    schedule_number: String,
    #[schema(value_type = String, format = Date, example = "2024-01-15")]
    schedule_date: String,
    /// `draft` or `submitted`.
    #[schema(example = "draft")]
    status: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::DeliveryStop`].
#[derive(ToSchema)]
#[schema(as = crate::domain::DeliveryStop)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DeliveryStopSchema {
    #[schema(value_type = String)]
    id: String,
    #[schema(value_type = String)]
    master_schedule_id: String,
    #[schema(value_type = Option<String>)]
    customer_id: Option<String>,
    /// Name captured when the stop was created.
    customer_name: String,
    customer_address: Option<String>,
    customer_phone: Option<String>,
    items: String,
    /// `pending`, `scheduled`, `completed` or `cancelled`.
    #[schema(example = "pending")]
    status: String,
    /// Set for stops generated from a recurring order.
    #[schema(value_type = Option<String>)]
    recurring_order_id: Option<String>,
    is_recurring: bool,
    #[schema(example = "Recurring weekly order")]
    notes: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::ScheduleWithStops`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ScheduleWithStops)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ScheduleWithStopsSchema {
    schedule: MasterScheduleSchema,
    stops: Vec<DeliveryStopSchema>,
}
