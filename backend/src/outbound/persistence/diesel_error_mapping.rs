//! Shared classification of pool and Diesel failures.
//!
//! Every dispatch port distinguishes an unreachable store (`Connection`), a
//! lost uniqueness race (`Conflict`) and any other rejected statement
//! (`Query`). Repositories convert a [`StoreFailure`] into their own port
//! error with a one-line match.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Port-agnostic failure category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    Connection(String),
    Conflict(String),
    Query(String),
}

/// Pool failures always mean the store is unreachable.
pub(crate) fn pool_failure(error: PoolError) -> StoreFailure {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StoreFailure::Connection(message)
        }
    }
}

/// Classify a Diesel error raised while running `operation`.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> StoreFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        other => debug!(error = %other, operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or("unique constraint");
            StoreFailure::Conflict(format!("{operation}: {constraint} violated"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _)
        | DieselError::BrokenTransactionManager => {
            StoreFailure::Connection(format!("{operation}: database connection error"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            let constraint = info.constraint_name().unwrap_or("foreign key");
            StoreFailure::Query(format!("{operation}: {constraint} violated"))
        }
        DieselError::NotFound => StoreFailure::Query(format!("{operation}: record not found")),
        _ => StoreFailure::Query(format!("{operation}: database error")),
    }
}
