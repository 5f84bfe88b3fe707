//! PostgreSQL-backed `DispatchScheduleRepository` using Diesel.
//!
//! `dispatch_schedules.schedule_date` carries a unique constraint, so a lost
//! creation race surfaces as a `Conflict` the sync engine can recover from.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DispatchScheduleRepository, DispatchScheduleRepositoryError};
use crate::domain::{MasterSchedule, ScheduleNumber, ScheduleStatus};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_failure};
use super::models::{DispatchScheduleRow, NewDispatchScheduleRow};
use super::pool::DbPool;
use super::schema::dispatch_schedules;

/// Diesel-backed master schedule store.
#[derive(Clone)]
pub struct DieselDispatchScheduleRepository {
    pool: DbPool,
}

impl DieselDispatchScheduleRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: StoreFailure) -> DispatchScheduleRepositoryError {
    match failure {
        StoreFailure::Connection(message) => DispatchScheduleRepositoryError::connection(message),
        StoreFailure::Conflict(message) => DispatchScheduleRepositoryError::conflict(message),
        StoreFailure::Query(message) => DispatchScheduleRepositoryError::query(message),
    }
}

fn to_domain(row: DispatchScheduleRow) -> Result<MasterSchedule, DispatchScheduleRepositoryError> {
    MasterSchedule::try_from(row)
        .map_err(|err| DispatchScheduleRepositoryError::query(format!("decode schedule: {err}")))
}

#[async_trait]
impl DispatchScheduleRepository for DieselDispatchScheduleRepository {
    async fn find_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<MasterSchedule>, DispatchScheduleRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(pool_failure(err)))?;

        dispatch_schedules::table
            .filter(dispatch_schedules::schedule_date.eq(date))
            .select(DispatchScheduleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(classify_diesel_error(err, "find dispatch schedule")))?
            .map(to_domain)
            .transpose()
    }

    async fn create(
        &self,
        date: NaiveDate,
        schedule_number: &ScheduleNumber,
    ) -> Result<MasterSchedule, DispatchScheduleRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(pool_failure(err)))?;

        let row = NewDispatchScheduleRow {
            schedule_number: schedule_number.as_str(),
            schedule_date: date,
            status: ScheduleStatus::Draft.as_str(),
        };

        let created = diesel::insert_into(dispatch_schedules::table)
            .values(&row)
            .returning(DispatchScheduleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err, "create dispatch schedule")))?;

        to_domain(created)
    }
}
