//! Builders wiring storage adapters into the driving ports.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{
    DeliveryStopRepository, DispatchScheduleQuery, DispatchScheduleRepository,
    RecurringOrderRepository, RecurringOrderSync, RecurringSyncMetrics,
};
use crate::domain::{DispatchScheduleQueryService, RecurringOrderSyncService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryDispatchStore;
use crate::outbound::persistence::{
    DbPool, DieselDeliveryStopRepository, DieselDispatchScheduleRepository,
    DieselRecurringOrderRepository,
};

use super::ServerConfig;

/// Storage backing the dispatch ports.
#[derive(Clone)]
pub enum DispatchBackend {
    /// PostgreSQL through the Diesel adapters.
    Postgres(DbPool),
    /// Process-local store; contents are lost on exit.
    Memory(InMemoryDispatchStore),
}

/// Driving ports shared by the HTTP server and the sync CLI.
#[derive(Clone)]
pub struct DispatchPorts {
    /// Sync engine.
    pub sync: Arc<dyn RecurringOrderSync>,
    /// Schedule read model.
    pub schedules: Arc<dyn DispatchScheduleQuery>,
}

fn ports_over<O, S, D>(
    orders: Arc<O>,
    schedules: Arc<S>,
    stops: Arc<D>,
    timeout: Duration,
    metrics: Arc<dyn RecurringSyncMetrics>,
) -> DispatchPorts
where
    O: RecurringOrderRepository + 'static,
    S: DispatchScheduleRepository + 'static,
    D: DeliveryStopRepository + 'static,
{
    let query = DispatchScheduleQueryService::new(schedules.clone(), stops.clone());
    let sync = RecurringOrderSyncService::new(orders, schedules, stops)
        .with_timeout(timeout)
        .with_metrics(metrics);
    DispatchPorts {
        sync: Arc::new(sync),
        schedules: Arc::new(query),
    }
}

/// Build the sync engine and schedule query over `backend`.
pub fn build_dispatch_ports(
    backend: &DispatchBackend,
    timeout: Duration,
    metrics: Arc<dyn RecurringSyncMetrics>,
) -> DispatchPorts {
    match backend {
        DispatchBackend::Postgres(pool) => ports_over(
            Arc::new(DieselRecurringOrderRepository::new(pool.clone())),
            Arc::new(DieselDispatchScheduleRepository::new(pool.clone())),
            Arc::new(DieselDeliveryStopRepository::new(pool.clone())),
            timeout,
            metrics,
        ),
        DispatchBackend::Memory(store) => {
            let store = Arc::new(store.clone());
            ports_over(store.clone(), store.clone(), store, timeout, metrics)
        }
    }
}

/// Build the HTTP state for `config`.
pub(crate) fn build_http_state(
    config: &ServerConfig,
    metrics: Arc<dyn RecurringSyncMetrics>,
) -> HttpState {
    let ports = build_dispatch_ports(&config.backend, config.sync_timeout, metrics);
    HttpState::new(ports.sync, ports.schedules).with_sync_token(config.sync_token.clone())
}
