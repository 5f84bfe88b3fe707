//! Recurring order sync endpoints.
//!
//! ```text
//! POST /api/v1/dispatch/recurring-sync            {"date":"2024-01-15"}
//! GET  /api/v1/dispatch/recurring-sync/preview?date=2024-01-15
//! ```
//!
//! Both endpoints answer with the `{success, ...}` envelope used by the
//! dispatch UI and cron callers. Every failure, including a malformed body,
//! is reported as `{"success": false, "error": "..."}`. Store failures are
//! logged in full but the envelope only names the failure class.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::domain::ports::{SyncError, SyncRecurringOrdersRequest};
use crate::domain::{RecurringOrder, weekday_name};

use super::service_auth::is_authorised;
use super::state::HttpState;

/// Request body for a sync run.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SyncRecurringOrdersBody {
    /// Target date, `YYYY-MM-DD`.
    #[schema(example = "2024-01-15")]
    #[serde(default)]
    pub date: Option<String>,
}

/// Success envelope for a sync run.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncSuccessEnvelope {
    /// Always `true`.
    pub success: bool,
    /// Stops created by this run.
    #[schema(example = 2)]
    pub stops_created: u32,
    /// Schedule the stops belong to.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub schedule_id: String,
}

/// Failure envelope shared by the sync endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SyncFailureEnvelope {
    /// Always `false`.
    pub success: bool,
    /// Failure description safe to show to users.
    #[schema(example = "date must be formatted as YYYY-MM-DD")]
    pub error: String,
}

/// Query string for a preview.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PreviewQuery {
    /// Target date, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: Option<String>,
}

/// One qualifying order in a preview.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOrder {
    /// Order identifier.
    pub id: String,
    /// Customer identifier, when set.
    pub customer_id: Option<String>,
    /// Customer name, when the reference resolves.
    pub customer_name: Option<String>,
    /// Items to deliver.
    pub items: String,
    /// Stored frequency.
    #[schema(example = "biweekly")]
    pub frequency: String,
    /// Preferred weekday.
    #[schema(example = "monday")]
    pub preferred_day: Option<String>,
}

impl From<RecurringOrder> for PreviewOrder {
    fn from(order: RecurringOrder) -> Self {
        let customer_name = order.resolved_customer().map(|c| c.name.clone());
        Self {
            id: order.id.to_string(),
            customer_id: order.customer_id.map(|id| id.to_string()),
            customer_name,
            items: order.items,
            frequency: order.frequency.as_str().to_owned(),
            preferred_day: order.preferred_day.map(|day| weekday_name(day).to_owned()),
        }
    }
}

/// Preview envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PreviewEnvelope {
    /// Always `true`.
    pub success: bool,
    /// Date previewed.
    #[schema(example = "2024-01-15")]
    pub date: String,
    /// Orders that would receive a stop.
    pub orders: Vec<PreviewOrder>,
}

/// Sync endpoint failure rendered as [`SyncFailureEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SyncFailure {
    status: StatusCode,
    message: String,
}

impl SyncFailure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn unauthorised() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "missing or invalid sync token")
    }

    /// Message placed in the envelope.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<SyncError> for SyncFailure {
    fn from(err: SyncError) -> Self {
        match &err {
            SyncError::Validation { message } => {
                warn!(error = %err, "rejected recurring sync request");
                Self::new(StatusCode::BAD_REQUEST, message.clone())
            }
            SyncError::Lookup { .. } => {
                error!(error = %err, "recurring sync lookup failed");
                Self::new(StatusCode::BAD_GATEWAY, "failed to load recurring orders")
            }
            SyncError::Store { stops_created, .. } => {
                error!(error = %err, "recurring sync store failure");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    format!("dispatch store failed after {stops_created} stop(s) were created"),
                )
            }
            SyncError::Timeout { .. } => {
                error!(error = %err, "recurring sync timed out");
                Self::new(StatusCode::GATEWAY_TIMEOUT, err.to_string())
            }
        }
    }
}

impl ResponseError for SyncFailure {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(SyncFailureEnvelope {
            success: false,
            error: self.message.clone(),
        })
    }
}

fn authorise(state: &HttpState, req: &HttpRequest) -> Result<(), SyncFailure> {
    if is_authorised(state.sync_token.as_ref(), req) {
        Ok(())
    } else {
        warn!(path = req.path(), "sync request rejected: bad service token");
        Err(SyncFailure::unauthorised())
    }
}

fn parse_body(body: &[u8]) -> Result<SyncRecurringOrdersBody, SyncFailure> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SyncRecurringOrdersBody::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, "malformed recurring sync body");
        SyncFailure::new(
            StatusCode::BAD_REQUEST,
            "request body must be a JSON object with a date field",
        )
    })
}

fn parse_date(raw: Option<&str>) -> Result<SyncRecurringOrdersRequest, SyncFailure> {
    Ok(SyncRecurringOrdersRequest::from_iso_date(raw.unwrap_or_default())?)
}

/// Create the missing recurring stops for a date.
#[utoipa::path(
    post,
    path = "/api/v1/dispatch/recurring-sync",
    description = "Materialise qualifying recurring orders into the dispatch schedule for a date. Safe to re-run.",
    request_body = SyncRecurringOrdersBody,
    responses(
        (status = 200, description = "Sync completed", body = SyncSuccessEnvelope),
        (status = 400, description = "Missing or malformed date", body = SyncFailureEnvelope),
        (status = 401, description = "Missing or invalid sync token", body = SyncFailureEnvelope),
        (status = 502, description = "Dispatch store failure", body = SyncFailureEnvelope),
        (status = 504, description = "Sync timed out", body = SyncFailureEnvelope)
    ),
    tags = ["dispatch"],
    operation_id = "syncRecurringOrders",
    security((), ("SyncToken" = []))
)]
#[post("/dispatch/recurring-sync")]
pub async fn sync_recurring_orders(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, SyncFailure> {
    authorise(&state, &req)?;
    let payload = parse_body(&body)?;
    let request = parse_date(payload.date.as_deref())?;

    let response = state.sync.sync(request).await?;
    info!(
        schedule_id = %response.schedule_id,
        stops_created = response.stops_created,
        "recurring sync request served"
    );
    Ok(HttpResponse::Ok().json(SyncSuccessEnvelope {
        success: true,
        stops_created: response.stops_created,
        schedule_id: response.schedule_id.to_string(),
    }))
}

/// List the orders a sync would materialise, without writing.
#[utoipa::path(
    get,
    path = "/api/v1/dispatch/recurring-sync/preview",
    params(("date" = String, Query, description = "Target date, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Qualifying orders", body = PreviewEnvelope),
        (status = 400, description = "Missing or malformed date", body = SyncFailureEnvelope),
        (status = 401, description = "Missing or invalid sync token", body = SyncFailureEnvelope),
        (status = 502, description = "Recurring order lookup failed", body = SyncFailureEnvelope),
        (status = 504, description = "Preview timed out", body = SyncFailureEnvelope)
    ),
    tags = ["dispatch"],
    operation_id = "previewRecurringSync",
    security((), ("SyncToken" = []))
)]
#[get("/dispatch/recurring-sync/preview")]
pub async fn preview_recurring_sync(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> Result<HttpResponse, SyncFailure> {
    authorise(&state, &req)?;
    let query = web::Query::<PreviewQuery>::from_query(req.query_string()).map_err(|err| {
        warn!(error = %err, "malformed preview query");
        SyncFailure::new(StatusCode::BAD_REQUEST, "date is required")
    })?;
    let request = parse_date(query.date.as_deref())?;

    let orders = state.sync.preview(request.target_date).await?;
    Ok(HttpResponse::Ok().json(PreviewEnvelope {
        success: true,
        date: request.target_date.to_string(),
        orders: orders.into_iter().map(PreviewOrder::from).collect(),
    }))
}

#[cfg(test)]
#[path = "recurring_sync_tests.rs"]
mod tests;
