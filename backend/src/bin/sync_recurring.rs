//! Cron-friendly recurring order sync.
//!
//! Runs one sync (or, with `--dry-run`, a preview) against PostgreSQL and
//! prints a one-line JSON summary. Exits non-zero when the run fails; stops
//! committed before the failure are reported in the summary.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use serde_json::{Value, json};
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use firewood_dispatch::TraceId;
use firewood_dispatch::domain::ports::{
    NoOpRecurringSyncMetrics, SyncError, SyncRecurringOrdersRequest, SyncRecurringOrdersResponse,
};
use firewood_dispatch::domain::{RecurringOrder, weekday_name};
use firewood_dispatch::outbound::persistence::{DbPool, PoolConfig};
use firewood_dispatch::server::{DispatchBackend, build_dispatch_ports};
use firewood_dispatch::settings::DispatchSettings;

/// `sync-recurring` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sync-recurring",
    about = "Create today's (or a given date's) recurring delivery stops",
    version
)]
struct CliArgs {
    /// Target date as `YYYY-MM-DD`. Defaults to today in local time.
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<String>,
    /// List qualifying orders without writing anything.
    #[arg(long)]
    dry_run: bool,
    /// Database connection URL. Falls back to `FIREWOOD_DATABASE_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(TraceId::scope(TraceId::generate(), async_main()))
}

async fn async_main() -> Result<()> {
    let args = CliArgs::parse();
    let settings = DispatchSettings::load_from_iter([OsString::from("sync-recurring")])
        .map_err(|err| eyre!("load settings: {err}"))?;

    let target_date = resolve_target_date(args.date.as_deref(), &DefaultClock)
        .map_err(|err| report_failure(&err))?;
    let database_url = resolve_database_url(
        args.database_url,
        settings.database_url(),
        env::var("DATABASE_URL").ok(),
    )?;

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(2))
        .await
        .wrap_err("create database pool")?;
    let timeout = settings.sync_timeout().wrap_err("invalid sync timeout")?;
    let ports = build_dispatch_ports(
        &DispatchBackend::Postgres(pool),
        timeout,
        Arc::new(NoOpRecurringSyncMetrics),
    );

    if args.dry_run {
        let orders = ports
            .sync
            .preview(target_date)
            .await
            .map_err(|err| report_failure(&err))?;
        println!("{}", preview_summary(target_date, &orders));
        return Ok(());
    }

    let response = ports
        .sync
        .sync(SyncRecurringOrdersRequest::new(target_date))
        .await
        .map_err(|err| report_failure(&err))?;
    println!("{}", success_summary(&response));
    Ok(())
}

fn resolve_target_date(raw: Option<&str>, clock: &impl Clock) -> Result<NaiveDate, SyncError> {
    match raw {
        Some(raw) => SyncRecurringOrdersRequest::from_iso_date(raw).map(|r| r.target_date),
        None => Ok(clock.local().date_naive()),
    }
}

fn resolve_database_url(
    flag: Option<String>,
    configured: Option<&str>,
    fallback: Option<String>,
) -> Result<String> {
    flag.or_else(|| configured.map(str::to_owned))
        .or(fallback)
        .map(|url| url.trim().to_owned())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            eyre!("no database configured; pass --database-url or set FIREWOOD_DATABASE_URL")
        })
}

fn success_summary(response: &SyncRecurringOrdersResponse) -> Value {
    json!({
        "success": true,
        "stopsCreated": response.stops_created,
        "scheduleId": response.schedule_id.to_string(),
        "scheduleNumber": response.schedule_number.as_str(),
        "date": response.schedule_date.to_string(),
        "skipped": response.skipped,
    })
}

fn preview_summary(date: NaiveDate, orders: &[RecurringOrder]) -> Value {
    let ids: Vec<String> = orders.iter().map(|order| order.id.to_string()).collect();
    json!({
        "success": true,
        "dryRun": true,
        "date": date.to_string(),
        "weekday": weekday_name(date.weekday()),
        "qualifying": orders.len(),
        "orders": ids,
    })
}

fn failure_summary(error: &SyncError) -> Value {
    json!({
        "success": false,
        "error": error.to_string(),
        "stopsCreated": error.stops_created(),
    })
}

fn report_failure(error: &SyncError) -> color_eyre::Report {
    println!("{}", failure_summary(error));
    eyre!("recurring sync failed: {error}")
}
