//! Behaviour tests for the recurring order sync.
//!
//! Scenarios drive the sync engine through the same port wiring the server
//! uses, backed by the in-memory dispatch store.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use firewood_dispatch::domain::ports::{
    DispatchScheduleRepository, NoOpRecurringSyncMetrics, SyncError, SyncRecurringOrdersRequest,
    SyncRecurringOrdersResponse,
};
use firewood_dispatch::domain::{
    CustomerId, CustomerSummary, Frequency, RecurringOrder, RecurringOrderId, ScheduleId,
    ScheduleNumber, StopStatus, parse_preferred_day,
};
use firewood_dispatch::outbound::memory::InMemoryDispatchStore;
use firewood_dispatch::server::{DispatchBackend, DispatchPorts, build_dispatch_ports};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::{Builder, Runtime};

struct SyncWorld {
    runtime: Runtime,
    store: InMemoryDispatchStore,
    ports: DispatchPorts,
    customers: RefCell<HashMap<String, CustomerId>>,
    last_outcome: RefCell<Option<Result<SyncRecurringOrdersResponse, SyncError>>>,
    seeded_schedule: RefCell<Option<ScheduleId>>,
    synced_schedules: RefCell<Vec<ScheduleId>>,
}

impl SyncWorld {
    fn new() -> Self {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("create runtime");
        let store = InMemoryDispatchStore::new();
        let ports = build_dispatch_ports(
            &DispatchBackend::Memory(store.clone()),
            Duration::from_secs(5),
            Arc::new(NoOpRecurringSyncMetrics),
        );
        Self {
            runtime,
            store,
            ports,
            customers: RefCell::new(HashMap::new()),
            last_outcome: RefCell::new(None),
            seeded_schedule: RefCell::new(None),
            synced_schedules: RefCell::new(Vec::new()),
        }
    }

    fn customer_id(&self, label: &str) -> CustomerId {
        *self
            .customers
            .borrow()
            .get(label)
            .unwrap_or_else(|| panic!("customer {label} should be declared"))
    }

    fn add_order(&self, label: &str, frequency: &str, day: &str, created: NaiveDate, active: bool) {
        let customer_id = self.customer_id(label);
        let created_at = Utc.from_utc_datetime(&created.and_time(NaiveTime::MIN));
        let order = RecurringOrder {
            id: RecurringOrderId::random(),
            customer_id: Some(customer_id),
            customer: None,
            items: format!("Kiln-dried logs for {label}"),
            frequency: Frequency::parse(frequency),
            preferred_day: parse_preferred_day(day),
            active,
            created_at,
        };
        self.runtime.block_on(self.store.insert_recurring_order(order));
    }

    fn response(&self) -> SyncRecurringOrdersResponse {
        match self.last_outcome.borrow().as_ref() {
            Some(Ok(response)) => response.clone(),
            Some(Err(err)) => panic!("expected sync to succeed, got: {err}"),
            None => panic!("sync should have run"),
        }
    }

    fn last_two_schedules(&self) -> (ScheduleId, ScheduleId) {
        match self.synced_schedules.borrow().as_slice() {
            [.., first, second] => (*first, *second),
            other => panic!("expected two successful syncs, saw {}", other.len()),
        }
    }

    fn customer_has_stop(&self, label: &str) -> bool {
        let customer_id = self.customer_id(label);
        self.runtime
            .block_on(self.store.stops())
            .iter()
            .any(|stop| stop.customer_id == Some(customer_id))
    }
}

fn parse_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("scenario dates use YYYY-MM-DD")
}

#[fixture]
fn world() -> SyncWorld {
    SyncWorld::new()
}

// Given steps

#[given("customer {label} exists")]
fn customer_exists(world: &SyncWorld, label: String) {
    let customer = CustomerSummary {
        id: CustomerId::random(),
        name: format!("Customer {label}"),
        address: Some(format!("{label} Road")),
        phone: Some("01234 567890".to_owned()),
    };
    world
        .customers
        .borrow_mut()
        .insert(label.clone(), customer.id);
    world.runtime.block_on(world.store.insert_customer(customer));
}

#[given("a {frequency} order for customer {label} on {day} created on {created}")]
fn an_active_order(world: &SyncWorld, frequency: String, label: String, day: String, created: String) {
    world.add_order(&label, &frequency, &day, parse_date(&created), true);
}

#[given("an inactive weekly order for customer {label} on {day}")]
fn an_inactive_order(world: &SyncWorld, label: String, day: String) {
    world.add_order(&label, "weekly", &day, parse_date("2024-01-01"), false);
}

#[given("customer {label} has been deleted")]
fn customer_has_been_deleted(world: &SyncWorld, label: String) {
    let id = world.customer_id(&label);
    let removed = world.runtime.block_on(world.store.remove_customer(id));
    assert!(removed.is_some(), "customer {label} should have been stored");
}

#[given("a schedule already exists for {date}")]
fn a_schedule_already_exists(world: &SyncWorld, date: String) {
    let date = parse_date(&date);
    let schedule = world
        .runtime
        .block_on(world.store.create(date, &ScheduleNumber::for_date(date)))
        .expect("seed schedule");
    *world.seeded_schedule.borrow_mut() = Some(schedule.id);
}

// When steps

#[when("recurring orders are synced for {date}")]
fn recurring_orders_are_synced(world: &SyncWorld, date: String) {
    let request = SyncRecurringOrdersRequest::new(parse_date(&date));
    let outcome = world.runtime.block_on(world.ports.sync.sync(request));
    if let Ok(response) = &outcome {
        world.synced_schedules.borrow_mut().push(response.schedule_id);
    }
    *world.last_outcome.borrow_mut() = Some(outcome);
}

// Then steps

#[then("the sync reports {count} stops created")]
fn the_sync_reports_stops_created(world: &SyncWorld, count: u32) {
    assert_eq!(world.response().stops_created, count);
}

#[then("{count} orders were skipped for a missing customer")]
fn orders_were_skipped_for_missing_customer(world: &SyncWorld, count: u32) {
    assert_eq!(world.response().skipped.missing_customer, count);
}

#[then("the schedule number is {number}")]
fn the_schedule_number_is(world: &SyncWorld, number: String) {
    assert_eq!(world.response().schedule_number.as_str(), number);
}

#[then("both syncs used the same schedule")]
fn both_syncs_used_the_same_schedule(world: &SyncWorld) {
    let (first, second) = world.last_two_schedules();
    assert_eq!(first, second);
}

#[then("the two syncs used different schedules")]
fn the_two_syncs_used_different_schedules(world: &SyncWorld) {
    let (first, second) = world.last_two_schedules();
    assert_ne!(first, second);
}

#[then("the sync used the existing schedule")]
fn the_sync_used_the_existing_schedule(world: &SyncWorld) {
    let seeded = (*world.seeded_schedule.borrow()).expect("a schedule should have been seeded");
    assert_eq!(world.response().schedule_id, seeded);
}

#[then("the store holds {count} schedules")]
fn the_store_holds_schedules(world: &SyncWorld, count: usize) {
    assert_eq!(world.runtime.block_on(world.store.schedules()).len(), count);
}

#[then("the store holds {count} stops")]
fn the_store_holds_stops(world: &SyncWorld, count: usize) {
    assert_eq!(world.runtime.block_on(world.store.stops()).len(), count);
}

#[then("every stop is a pending recurring stop")]
fn every_stop_is_pending_and_recurring(world: &SyncWorld) {
    let schedule_id = world.response().schedule_id;
    let stops = world.runtime.block_on(world.store.stops());
    assert!(!stops.is_empty(), "expected at least one stop");
    for stop in stops {
        assert_eq!(stop.master_schedule_id, schedule_id);
        assert_eq!(stop.status, StopStatus::Pending);
        assert!(stop.is_recurring);
        assert!(stop.recurring_order_id.is_some());
        let notes = stop.notes.expect("recurring stops carry notes");
        assert!(notes.starts_with("Recurring "), "unexpected notes: {notes}");
    }
}

#[then("a stop exists for customer {label}")]
fn a_stop_exists_for_customer(world: &SyncWorld, label: String) {
    assert!(world.customer_has_stop(&label), "expected a stop for {label}");
}

#[then("no stop exists for customer {label}")]
fn no_stop_exists_for_customer(world: &SyncWorld, label: String) {
    assert!(!world.customer_has_stop(&label), "unexpected stop for {label}");
}

// Scenario bindings

#[scenario(
    path = "tests/features/recurring_sync.feature",
    name = "Qualifying orders become stops on a new schedule"
)]
fn qualifying_orders_become_stops(world: SyncWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/recurring_sync.feature",
    name = "Re-running the sync for the same date creates nothing"
)]
fn rerunning_the_sync_creates_nothing(world: SyncWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/recurring_sync.feature",
    name = "A new date gets a new schedule"
)]
fn a_new_date_gets_a_new_schedule(world: SyncWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/recurring_sync.feature",
    name = "An existing schedule for the date is reused"
)]
fn existing_schedule_is_reused(world: SyncWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/recurring_sync.feature",
    name = "Biweekly orders skip the off week"
)]
fn biweekly_orders_skip_the_off_week(world: SyncWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/recurring_sync.feature",
    name = "Monthly orders only run on the first matching weekday"
)]
fn monthly_orders_run_on_first_weekday(world: SyncWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/recurring_sync.feature",
    name = "Orders whose customer was deleted are skipped"
)]
fn orders_with_deleted_customer_are_skipped(world: SyncWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/recurring_sync.feature",
    name = "Inactive orders are ignored"
)]
fn inactive_orders_are_ignored(world: SyncWorld) {
    let _ = world;
}
