//! Read-side service returning a day's schedule with its stops.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{
    DeliveryStopRepository, DeliveryStopRepositoryError, DispatchScheduleQuery,
    DispatchScheduleRepository, DispatchScheduleRepositoryError,
};
use crate::domain::{Error, ScheduleWithStops};

fn map_schedule_error(error: DispatchScheduleRepositoryError) -> Error {
    match error {
        DispatchScheduleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("dispatch schedule store unavailable: {message}"))
        }
        DispatchScheduleRepositoryError::Query { message }
        | DispatchScheduleRepositoryError::Conflict { message } => {
            Error::internal(format!("dispatch schedule store error: {message}"))
        }
    }
}

fn map_stop_error(error: DeliveryStopRepositoryError) -> Error {
    match error {
        DeliveryStopRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("delivery stop store unavailable: {message}"))
        }
        DeliveryStopRepositoryError::Query { message }
        | DeliveryStopRepositoryError::Conflict { message } => {
            Error::internal(format!("delivery stop store error: {message}"))
        }
    }
}

/// Service implementing [`DispatchScheduleQuery`].
#[derive(Clone)]
pub struct DispatchScheduleQueryService<S, D> {
    schedules: Arc<S>,
    stops: Arc<D>,
}

impl<S, D> DispatchScheduleQueryService<S, D> {
    /// Create a query service over the schedule and stop stores.
    pub const fn new(schedules: Arc<S>, stops: Arc<D>) -> Self {
        Self { schedules, stops }
    }
}

#[async_trait]
impl<S, D> DispatchScheduleQuery for DispatchScheduleQueryService<S, D>
where
    S: DispatchScheduleRepository,
    D: DeliveryStopRepository,
{
    async fn schedule_for_date(&self, date: NaiveDate) -> Result<ScheduleWithStops, Error> {
        let schedule = self
            .schedules
            .find_by_date(date)
            .await
            .map_err(map_schedule_error)?
            .ok_or_else(|| Error::not_found(format!("no dispatch schedule for {date}")))?;

        let stops = self
            .stops
            .list_for_schedule(schedule.id)
            .await
            .map_err(map_stop_error)?;

        Ok(ScheduleWithStops { schedule, stops })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockDeliveryStopRepository, MockDispatchScheduleRepository};
    use crate::domain::{
        ErrorCode, MasterSchedule, ScheduleId, ScheduleNumber, ScheduleStatus,
    };
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date")
    }

    fn schedule(date: NaiveDate) -> MasterSchedule {
        let now = Utc::now();
        MasterSchedule {
            id: ScheduleId::random(),
            schedule_number: ScheduleNumber::for_date(date),
            schedule_date: date,
            status: ScheduleStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn returns_schedule_with_its_stops(date: NaiveDate) {
        let existing = schedule(date);
        let schedule_id = existing.id;
        let mut schedules = MockDispatchScheduleRepository::new();
        schedules
            .expect_find_by_date()
            .times(1)
            .return_once(move |_| Ok(Some(existing)));
        let mut stops = MockDeliveryStopRepository::new();
        stops
            .expect_list_for_schedule()
            .withf(move |id| *id == schedule_id)
            .times(1)
            .return_once(|_| Ok(Vec::new()));

        let service = DispatchScheduleQueryService::new(Arc::new(schedules), Arc::new(stops));
        let result = service.schedule_for_date(date).await.expect("schedule found");

        assert_eq!(result.schedule.id, schedule_id);
        assert!(result.stops.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn missing_schedule_is_not_found(date: NaiveDate) {
        let mut schedules = MockDispatchScheduleRepository::new();
        schedules
            .expect_find_by_date()
            .return_once(|_| Ok(None));
        let mut stops = MockDeliveryStopRepository::new();
        stops.expect_list_for_schedule().times(0);

        let service = DispatchScheduleQueryService::new(Arc::new(schedules), Arc::new(stops));
        let err = service.schedule_for_date(date).await.expect_err("not found");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "no dispatch schedule for 2024-01-15");
    }

    #[rstest]
    #[case(DispatchScheduleRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(DispatchScheduleRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn schedule_store_errors_are_mapped(
        date: NaiveDate,
        #[case] failure: DispatchScheduleRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut schedules = MockDispatchScheduleRepository::new();
        schedules
            .expect_find_by_date()
            .return_once(move |_| Err(failure));
        let stops = MockDeliveryStopRepository::new();

        let service = DispatchScheduleQueryService::new(Arc::new(schedules), Arc::new(stops));
        let err = service.schedule_for_date(date).await.expect_err("store failure");

        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn stop_store_outage_is_service_unavailable(date: NaiveDate) {
        let existing = schedule(date);
        let mut schedules = MockDispatchScheduleRepository::new();
        schedules
            .expect_find_by_date()
            .return_once(move |_| Ok(Some(existing)));
        let mut stops = MockDeliveryStopRepository::new();
        stops
            .expect_list_for_schedule()
            .return_once(|_| Err(DeliveryStopRepositoryError::connection("reset")));

        let service = DispatchScheduleQueryService::new(Arc::new(schedules), Arc::new(stops));
        let err = service.schedule_for_date(date).await.expect_err("store failure");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
