//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel.
//! - **memory**: in-process store for database-less runs and tests.
//! - **metrics**: Prometheus exporters (feature-gated).
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
