//! Dispatch server entry-point.

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use firewood_dispatch::inbound::http::health::HealthState;
use firewood_dispatch::inbound::http::service_auth::ServiceToken;
use firewood_dispatch::outbound::memory::InMemoryDispatchStore;
use firewood_dispatch::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use firewood_dispatch::server::{DispatchBackend, ServerConfig, create_server};
use firewood_dispatch::settings::DispatchSettings;

async fn build_backend(settings: &DispatchSettings) -> std::io::Result<DispatchBackend> {
    let Some(url) = settings.database_url() else {
        warn!("FIREWOOD_DATABASE_URL not set; using the in-memory dispatch store");
        return Ok(DispatchBackend::Memory(InMemoryDispatchStore::new()));
    };

    if settings.run_migrations {
        let migration_url = url.to_owned();
        let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
            .await
            .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        info!(applied, "database schema up to date");
    }

    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(std::io::Error::other)?;
    Ok(DispatchBackend::Postgres(pool))
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("firewood")
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = DispatchSettings::load().map_err(|err| std::io::Error::other(err.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let sync_timeout = settings.sync_timeout().map_err(std::io::Error::other)?;
    let backend = build_backend(&settings).await?;

    let config = ServerConfig::new(bind_addr, backend)
        .with_cors_origins(settings.cors_origins())
        .with_sync_timeout(sync_timeout)
        .with_sync_token(settings.sync_token().and_then(ServiceToken::from_secret));
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(make_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
