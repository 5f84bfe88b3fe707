//! PostgreSQL-backed `DeliveryStopRepository` using Diesel.
//!
//! Each insert runs as its own statement and commits independently. The
//! partial unique index `delivery_stops_recurring_order_key` turns a
//! duplicate recurring stop into a `Conflict`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DeliveryStopRepository, DeliveryStopRepositoryError};
use crate::domain::{DeliveryStop, NewDeliveryStop, RecurringOrderId, ScheduleId};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_failure};
use super::models::{DeliveryStopRow, NewDeliveryStopRow};
use super::pool::DbPool;
use super::schema::delivery_stops;

/// Diesel-backed delivery stop store.
#[derive(Clone)]
pub struct DieselDeliveryStopRepository {
    pool: DbPool,
}

impl DieselDeliveryStopRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: StoreFailure) -> DeliveryStopRepositoryError {
    match failure {
        StoreFailure::Connection(message) => DeliveryStopRepositoryError::connection(message),
        StoreFailure::Conflict(message) => DeliveryStopRepositoryError::conflict(message),
        StoreFailure::Query(message) => DeliveryStopRepositoryError::query(message),
    }
}

fn to_domain(row: DeliveryStopRow) -> Result<DeliveryStop, DeliveryStopRepositoryError> {
    DeliveryStop::try_from(row)
        .map_err(|err| DeliveryStopRepositoryError::query(format!("decode delivery stop: {err}")))
}

#[async_trait]
impl DeliveryStopRepository for DieselDeliveryStopRepository {
    async fn find_for_recurring_order(
        &self,
        schedule_id: ScheduleId,
        recurring_order_id: RecurringOrderId,
    ) -> Result<Option<DeliveryStop>, DeliveryStopRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(pool_failure(err)))?;

        delivery_stops::table
            .filter(delivery_stops::master_schedule_id.eq(*schedule_id.as_uuid()))
            .filter(delivery_stops::recurring_order_id.eq(*recurring_order_id.as_uuid()))
            .select(DeliveryStopRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_failure(classify_diesel_error(err, "find delivery stop")))?
            .map(to_domain)
            .transpose()
    }

    async fn create(
        &self,
        stop: NewDeliveryStop,
    ) -> Result<DeliveryStop, DeliveryStopRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(pool_failure(err)))?;

        let row = NewDeliveryStopRow::from(&stop);
        let created = diesel::insert_into(delivery_stops::table)
            .values(&row)
            .returning(DeliveryStopRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err, "create delivery stop")))?;

        to_domain(created)
    }

    async fn list_for_schedule(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<DeliveryStop>, DeliveryStopRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(pool_failure(err)))?;

        delivery_stops::table
            .filter(delivery_stops::master_schedule_id.eq(*schedule_id.as_uuid()))
            .order((delivery_stops::created_at.asc(), delivery_stops::id.asc()))
            .select(DeliveryStopRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err, "list delivery stops")))?
            .into_iter()
            .map(to_domain)
            .collect()
    }
}
