//! PostgreSQL-backed `RecurringOrderRepository` using Diesel.

use async_trait::async_trait;
use chrono::Weekday;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecurringOrderRepository, RecurringOrderRepositoryError};
use crate::domain::{RecurringOrder, weekday_name};

use super::diesel_error_mapping::{StoreFailure, classify_diesel_error, pool_failure};
use super::models::{CustomerRow, RecurringOrderRow};
use super::pool::DbPool;
use super::schema::{customers, recurring_orders};

diesel::define_sql_function!(fn lower(value: Nullable<Text>) -> Nullable<Text>);
diesel::define_sql_function!(fn btrim(value: Nullable<Text>) -> Nullable<Text>);

/// Diesel-backed recurring order registry.
#[derive(Clone)]
pub struct DieselRecurringOrderRepository {
    pool: DbPool,
}

impl DieselRecurringOrderRepository {
    /// Create a new repository with the given connection pool.
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_failure(failure: StoreFailure) -> RecurringOrderRepositoryError {
    match failure {
        StoreFailure::Connection(message) => RecurringOrderRepositoryError::connection(message),
        StoreFailure::Conflict(message) | StoreFailure::Query(message) => {
            RecurringOrderRepositoryError::query(message)
        }
    }
}

#[async_trait]
impl RecurringOrderRepository for DieselRecurringOrderRepository {
    async fn list_active_for_weekday(
        &self,
        weekday: Weekday,
    ) -> Result<Vec<RecurringOrder>, RecurringOrderRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_failure(pool_failure(err)))?;

        let rows: Vec<(RecurringOrderRow, Option<CustomerRow>)> = recurring_orders::table
            .left_join(customers::table)
            .filter(recurring_orders::active_status.eq(true))
            .filter(lower(btrim(recurring_orders::preferred_day)).eq(weekday_name(weekday)))
            .order((recurring_orders::created_at.asc(), recurring_orders::id.asc()))
            .select((
                RecurringOrderRow::as_select(),
                Option::<CustomerRow>::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(|err| map_failure(classify_diesel_error(err, "list recurring orders")))?;

        Ok(rows
            .into_iter()
            .map(|(order, customer)| order.into_domain(customer))
            .collect())
    }
}
