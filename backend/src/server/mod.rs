//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{DispatchBackend, DispatchPorts, build_dispatch_ports};

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::Uri;
use actix_web::http::header::{self, HeaderName};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::TRACE_ID_HEADER;
use crate::domain::ports::{NoOpRecurringSyncMetrics, RecurringSyncMetrics};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::recurring_sync::{preview_recurring_sync, sync_recurring_orders};
use crate::inbound::http::schedules::get_schedule;
use crate::inbound::http::state::HttpState;
#[cfg(feature = "metrics")]
use crate::outbound::metrics::PrometheusRecurringSyncMetrics;
#[cfg(feature = "metrics")]
use metrics::MetricsLayer;
use state_builders::build_http_state;

fn usable_origin(origin: &str) -> bool {
    origin != "*"
        && origin
            .parse::<Uri>()
            .is_ok_and(|uri| uri.scheme().is_some() && uri.host().is_some())
}

/// CORS policy for browser-triggered syncs. No origins means any origin.
pub fn cors_policy(origins: &[String]) -> Cors {
    let trace_header = HeaderName::from_static(TRACE_ID_HEADER);
    let base = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            trace_header.clone(),
        ])
        .expose_headers(vec![trace_header])
        .max_age(3600);

    let allowed: Vec<&String> = origins
        .iter()
        .filter(|origin| {
            let usable = usable_origin(origin);
            if !usable {
                warn!(%origin, "ignoring malformed CORS origin");
            }
            usable
        })
        .collect();

    if allowed.is_empty() {
        base.allow_any_origin().send_wildcard()
    } else {
        allowed
            .into_iter()
            .fold(base, |cors, origin| cors.allowed_origin(origin))
    }
}

/// Assemble the application: dispatch API under `/api/v1`, health probes
/// and, in debug builds, Swagger UI at `/docs`.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cors_origins: &[String],
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody + use<>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let api = web::scope("/api/v1")
        .service(sync_recurring_orders)
        .service(preview_recurring_sync)
        .service(get_schedule);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.wrap(cors_policy(cors_origins)).wrap(Trace)
}

#[cfg(feature = "metrics")]
fn sync_metrics(config: &ServerConfig) -> std::io::Result<Arc<dyn RecurringSyncMetrics>> {
    match &config.prometheus {
        Some(prometheus) => PrometheusRecurringSyncMetrics::new(&prometheus.registry)
            .map(|metrics| Arc::new(metrics) as Arc<dyn RecurringSyncMetrics>)
            .map_err(|err| {
                std::io::Error::other(format!("recurring sync metrics registration failed: {err}"))
            }),
        None => Ok(Arc::new(NoOpRecurringSyncMetrics)),
    }
}

#[cfg(not(feature = "metrics"))]
fn sync_metrics(_config: &ServerConfig) -> std::io::Result<Arc<dyn RecurringSyncMetrics>> {
    Ok(Arc::new(NoOpRecurringSyncMetrics))
}

/// Bind and start the HTTP server.
///
/// # Errors
/// Propagates [`std::io::Error`] when metric registration or binding fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let metrics = sync_metrics(&config)?;
    let http_state = web::Data::new(build_http_state(&config, metrics));
    match http_state.sync_token.as_ref() {
        Some(token) => info!(fingerprint = %token.fingerprint(), "sync endpoints require a token"),
        None => warn!("no sync token configured; sync endpoints accept anonymous calls"),
    }

    let ServerConfig {
        bind_addr,
        cors_origins,
        #[cfg(feature = "metrics")]
        prometheus,
        ..
    } = config;
    let server_health_state = health_state.clone();

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(
            server_health_state.clone(),
            http_state.clone(),
            &cors_origins,
        );

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "dispatch server listening");
    health_state.mark_ready();
    Ok(server)
}
