//! Dispatch schedule read endpoint.
//!
//! ```text
//! GET /api/v1/dispatch/schedules/{date}
//! ```

use actix_web::{HttpResponse, get, web};

use crate::domain::Error;
use crate::domain::ports::{SyncError, SyncRecurringOrdersRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ScheduleWithStopsSchema;
use crate::inbound::http::state::HttpState;

fn parse_path_date(raw: &str) -> ApiResult<chrono::NaiveDate> {
    SyncRecurringOrdersRequest::from_iso_date(raw)
        .map(|request| request.target_date)
        .map_err(|err| match err {
            SyncError::Validation { message } => Error::invalid_request(message),
            other => Error::internal(other.to_string()),
        })
}

/// Fetch the schedule for a date together with its stops.
#[utoipa::path(
    get,
    path = "/api/v1/dispatch/schedules/{date}",
    params(("date" = String, Path, description = "Schedule date, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Schedule and stops", body = ScheduleWithStopsSchema),
        (status = 400, description = "Malformed date", body = Error),
        (status = 404, description = "No schedule for the date", body = Error),
        (status = 503, description = "Dispatch store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["dispatch"],
    operation_id = "getDispatchSchedule",
    security([])
)]
#[get("/dispatch/schedules/{date}")]
pub async fn get_schedule(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let date = parse_path_date(&path)?;
    let schedule = state.schedules.schedule_for_date(date).await?;
    Ok(HttpResponse::Ok().json(schedule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockDispatchScheduleQuery, MockRecurringOrderSync};
    use crate::domain::{
        MasterSchedule, ScheduleId, ScheduleNumber, ScheduleStatus, ScheduleWithStops,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::{NaiveDate, Utc};
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    fn jan_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
    }

    async fn get(query: MockDispatchScheduleQuery, uri: &str) -> (StatusCode, Value) {
        let state = web::Data::new(HttpState::new(
            Arc::new(MockRecurringOrderSync::new()),
            Arc::new(query),
        ));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .service(web::scope("/api/v1").service(get_schedule)),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn returns_schedule_with_stops() {
        let schedule = MasterSchedule {
            id: ScheduleId::random(),
            schedule_number: ScheduleNumber::for_date(jan_15()),
            schedule_date: jan_15(),
            status: ScheduleStatus::Draft,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let mut query = MockDispatchScheduleQuery::new();
        query
            .expect_schedule_for_date()
            .with(eq(jan_15()))
            .times(1)
            .returning(move |_| {
                Ok(ScheduleWithStops {
                    schedule: schedule.clone(),
                    stops: Vec::new(),
                })
            });

        let (status, body) = get(query, "/api/v1/dispatch/schedules/2024-01-15").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["schedule"]["scheduleNumber"], "DS-20240115-01");
        assert_eq!(body["schedule"]["status"], "draft");
        assert_eq!(body["stops"], Value::Array(Vec::new()));
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_dates_are_invalid_requests() {
        let mut query = MockDispatchScheduleQuery::new();
        query.expect_schedule_for_date().never();

        let (status, body) = get(query, "/api/v1/dispatch/schedules/2024-1-5").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_schedules_are_not_found() {
        let mut query = MockDispatchScheduleQuery::new();
        query
            .expect_schedule_for_date()
            .returning(|date| Err(Error::not_found(format!("no dispatch schedule for {date}"))));

        let (status, body) = get(query, "/api/v1/dispatch/schedules/2024-01-15").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }
}
