//! HTTP inbound adapter exposing the dispatch REST endpoints.

pub mod error;
pub mod health;
pub mod recurring_sync;
pub mod schedules;
pub mod schemas;
pub mod service_auth;
pub mod state;

pub use error::ApiResult;
