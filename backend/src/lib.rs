//! Firewood dispatch backend.
//!
//! Expands recurring customer orders into the daily dispatch schedule and
//! exposes the sync over HTTP and a cron-friendly CLI.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
