//! HTTP server configuration.

use std::net::SocketAddr;
use std::time::Duration;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

use crate::domain::DEFAULT_SYNC_TIMEOUT;
use crate::inbound::http::service_auth::ServiceToken;

use super::DispatchBackend;

/// Builder-style configuration for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) backend: DispatchBackend,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) sync_timeout: Duration,
    pub(crate) sync_token: Option<ServiceToken>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Configuration with open CORS, no sync token and the default timeout.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, backend: DispatchBackend) -> Self {
        Self {
            bind_addr,
            backend,
            cors_origins: Vec::new(),
            sync_timeout: DEFAULT_SYNC_TIMEOUT,
            sync_token: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Restrict CORS to `origins`. Empty allows any origin.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Bound each sync run by `timeout`.
    #[must_use]
    pub fn with_sync_timeout(mut self, timeout: Duration) -> Self {
        self.sync_timeout = timeout;
        self
    }

    /// Require a bearer token on the sync endpoints.
    #[must_use]
    pub fn with_sync_token(mut self, token: Option<ServiceToken>) -> Self {
        self.sync_token = token;
        self
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware; its registry also receives sync metrics.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
