//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be tested with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{DispatchScheduleQuery, RecurringOrderSync};

use super::service_auth::ServiceToken;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Recurring order sync engine.
    pub sync: Arc<dyn RecurringOrderSync>,
    /// Schedule read model.
    pub schedules: Arc<dyn DispatchScheduleQuery>,
    /// Token required by the sync endpoints, if any.
    pub sync_token: Option<ServiceToken>,
}

impl HttpState {
    /// Build state with open sync endpoints.
    pub fn new(
        sync: Arc<dyn RecurringOrderSync>,
        schedules: Arc<dyn DispatchScheduleQuery>,
    ) -> Self {
        Self {
            sync,
            schedules,
            sync_token: None,
        }
    }

    /// Require `token` on the sync endpoints.
    #[must_use]
    pub fn with_sync_token(mut self, token: Option<ServiceToken>) -> Self {
        self.sync_token = token;
        self
    }
}
