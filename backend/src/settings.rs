//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `FIREWOOD_*` environment variables (and any OrthoConfig
//! file or CLI layer). Unset optional values fall back to the defaults
//! below.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_SYNC_TIMEOUT;
use crate::outbound::persistence::DEFAULT_POOL_MAX_SIZE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    /// The sync timeout was zero.
    #[error("sync timeout must be at least one second")]
    ZeroTimeout,
}

/// Runtime settings for the dispatch service and sync CLI.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FIREWOOD")]
pub struct DispatchSettings {
    /// PostgreSQL connection string. Unset means the in-memory store.
    pub database_url: Option<String>,
    /// Listen address for the HTTP server.
    pub bind_addr: Option<String>,
    /// Upper bound on a single sync run, in seconds.
    #[ortho_config(default = 30)]
    pub sync_timeout_secs: u64,
    /// Bearer token required by the sync endpoints.
    pub sync_token: Option<String>,
    /// Comma separated CORS origins. Unset allows any origin.
    pub cors_allowed_origins: Option<String>,
    /// Apply embedded migrations at startup.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Maximum pooled database connections.
    #[ortho_config(default = 10)]
    pub pool_max_size: u32,
}

impl DispatchSettings {
    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).trim();
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Sync run time budget.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero value.
    pub fn sync_timeout(&self) -> Result<Duration, SettingsError> {
        match self.sync_timeout_secs {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Configured sync token, ignoring blank values.
    pub fn sync_token(&self) -> Option<&str> {
        self.sync_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Allowed CORS origins. Empty means any origin.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Pool size, clamped to at least one.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.max(1)
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_addr: None,
            sync_timeout_secs: DEFAULT_SYNC_TIMEOUT.as_secs(),
            sync_token: None,
            cors_allowed_origins: None,
            run_migrations: true,
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
        }
    }
}
