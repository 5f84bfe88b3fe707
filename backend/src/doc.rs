//! OpenAPI documentation for the dispatch API.
//!
//! Served by Swagger UI at `/docs` in debug builds and printed by the
//! `openapi-dump` binary.

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::recurring_sync::{
    PreviewEnvelope, PreviewOrder, SyncFailureEnvelope, SyncRecurringOrdersBody,
    SyncSuccessEnvelope,
};
use crate::inbound::http::schemas::{
    DeliveryStopSchema, MasterScheduleSchema, ScheduleWithStopsSchema,
};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the optional bearer token guarding the sync endpoints.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut scheme = Http::new(HttpAuthScheme::Bearer);
        scheme.description =
            Some("Shared sync token, required when FIREWOOD_SYNC_TOKEN is set.".to_owned());
        components.add_security_scheme("SyncToken", SecurityScheme::Http(scheme));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Firewood dispatch API",
        description = "Recurring order sync, dispatch schedule reads and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::recurring_sync::sync_recurring_orders,
        crate::inbound::http::recurring_sync::preview_recurring_sync,
        crate::inbound::http::schedules::get_schedule,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SyncRecurringOrdersBody,
        SyncSuccessEnvelope,
        SyncFailureEnvelope,
        PreviewEnvelope,
        PreviewOrder,
        ScheduleWithStopsSchema,
        MasterScheduleSchema,
        DeliveryStopSchema,
        Error,
        ErrorCode
    )),
    tags(
        (name = "dispatch", description = "Recurring sync and dispatch schedules"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
