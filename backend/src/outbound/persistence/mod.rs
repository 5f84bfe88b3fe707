//! PostgreSQL persistence adapters using Diesel.
//!
//! Adapters translate between internal row structs and domain records and
//! classify database failures into the port error variants. They hold no
//! business rules.
//!
//! ```ignore
//! use firewood_dispatch::outbound::persistence::{
//!     DbPool, DieselRecurringOrderRepository, PoolConfig,
//! };
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/firewood")).await?;
//! let orders = DieselRecurringOrderRepository::new(pool);
//! ```

mod diesel_delivery_stop_repository;
mod diesel_dispatch_schedule_repository;
mod diesel_error_mapping;
mod diesel_recurring_order_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_delivery_stop_repository::DieselDeliveryStopRepository;
pub use diesel_dispatch_schedule_repository::DieselDispatchScheduleRepository;
pub use diesel_recurring_order_repository::DieselRecurringOrderRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DEFAULT_POOL_MAX_SIZE, DbPool, PoolConfig, PoolError};
