//! In-process dispatch store.
//!
//! Implements every dispatch driven port over a single mutex-guarded state
//! so the server can run without PostgreSQL and behaviour tests can exercise
//! the sync engine end to end. Uniqueness rules match the database: one
//! schedule per date, one recurring stop per `(schedule, recurring order)`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc, Weekday};
use tokio::sync::Mutex;

use crate::domain::ports::{
    DeliveryStopRepository, DeliveryStopRepositoryError, DispatchScheduleRepository,
    DispatchScheduleRepositoryError, RecurringOrderRepository, RecurringOrderRepositoryError,
};
use crate::domain::{
    CustomerId, CustomerSummary, DeliveryStop, DeliveryStopId, MasterSchedule, NewDeliveryStop,
    RecurringOrder, RecurringOrderId, ScheduleId, ScheduleNumber, ScheduleStatus,
};

#[derive(Debug, Default)]
struct State {
    customers: HashMap<CustomerId, CustomerSummary>,
    orders: Vec<RecurringOrder>,
    schedules: Vec<MasterSchedule>,
    stops: Vec<DeliveryStop>,
}

/// Shared in-memory store. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDispatchStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryDispatchStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a customer.
    pub async fn insert_customer(&self, customer: CustomerSummary) {
        self.state
            .lock()
            .await
            .customers
            .insert(customer.id, customer);
    }

    /// Delete a customer. Orders keep their dangling `customer_id`.
    pub async fn remove_customer(&self, id: CustomerId) -> Option<CustomerSummary> {
        self.state.lock().await.customers.remove(&id)
    }

    /// Add or replace a recurring order.
    ///
    /// Any embedded customer is ignored; the customer is joined from the
    /// directory on read.
    pub async fn insert_recurring_order(&self, order: RecurringOrder) {
        let mut state = self.state.lock().await;
        let stored = RecurringOrder {
            customer: None,
            ..order
        };
        match state.orders.iter_mut().find(|existing| existing.id == stored.id) {
            Some(existing) => *existing = stored,
            None => state.orders.push(stored),
        }
    }

    /// Snapshot of every stored schedule.
    pub async fn schedules(&self) -> Vec<MasterSchedule> {
        self.state.lock().await.schedules.clone()
    }

    /// Snapshot of every stored stop.
    pub async fn stops(&self) -> Vec<DeliveryStop> {
        self.state.lock().await.stops.clone()
    }
}

#[async_trait]
impl RecurringOrderRepository for InMemoryDispatchStore {
    async fn list_active_for_weekday(
        &self,
        weekday: Weekday,
    ) -> Result<Vec<RecurringOrder>, RecurringOrderRepositoryError> {
        let state = self.state.lock().await;
        let mut orders: Vec<RecurringOrder> = state
            .orders
            .iter()
            .filter(|order| order.active && order.preferred_day == Some(weekday))
            .map(|order| RecurringOrder {
                customer: order
                    .customer_id
                    .and_then(|id| state.customers.get(&id).cloned()),
                ..order.clone()
            })
            .collect();
        orders.sort_by_key(|order| (order.created_at, order.id));
        Ok(orders)
    }
}

#[async_trait]
impl DispatchScheduleRepository for InMemoryDispatchStore {
    async fn find_by_date(
        &self,
        date: NaiveDate,
    ) -> Result<Option<MasterSchedule>, DispatchScheduleRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .schedules
            .iter()
            .find(|schedule| schedule.schedule_date == date)
            .cloned())
    }

    async fn create(
        &self,
        date: NaiveDate,
        schedule_number: &ScheduleNumber,
    ) -> Result<MasterSchedule, DispatchScheduleRepositoryError> {
        let mut state = self.state.lock().await;
        if state
            .schedules
            .iter()
            .any(|schedule| schedule.schedule_date == date)
        {
            return Err(DispatchScheduleRepositoryError::conflict(format!(
                "schedule for {date} already exists"
            )));
        }
        let now = Utc::now();
        let schedule = MasterSchedule {
            id: ScheduleId::random(),
            schedule_number: schedule_number.clone(),
            schedule_date: date,
            status: ScheduleStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        state.schedules.push(schedule.clone());
        Ok(schedule)
    }
}

#[async_trait]
impl DeliveryStopRepository for InMemoryDispatchStore {
    async fn find_for_recurring_order(
        &self,
        schedule_id: ScheduleId,
        recurring_order_id: RecurringOrderId,
    ) -> Result<Option<DeliveryStop>, DeliveryStopRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .stops
            .iter()
            .find(|stop| {
                stop.master_schedule_id == schedule_id
                    && stop.recurring_order_id == Some(recurring_order_id)
            })
            .cloned())
    }

    async fn create(
        &self,
        stop: NewDeliveryStop,
    ) -> Result<DeliveryStop, DeliveryStopRepositoryError> {
        let mut state = self.state.lock().await;
        if !state
            .schedules
            .iter()
            .any(|schedule| schedule.id == stop.master_schedule_id)
        {
            return Err(DeliveryStopRepositoryError::query(format!(
                "schedule {} does not exist",
                stop.master_schedule_id
            )));
        }
        if state.stops.iter().any(|existing| {
            existing.master_schedule_id == stop.master_schedule_id
                && existing.recurring_order_id == Some(stop.recurring_order_id)
        }) {
            return Err(DeliveryStopRepositoryError::conflict(format!(
                "recurring order {} already on schedule {}",
                stop.recurring_order_id, stop.master_schedule_id
            )));
        }
        let created = DeliveryStop {
            id: DeliveryStopId::random(),
            master_schedule_id: stop.master_schedule_id,
            customer_id: Some(stop.customer_id),
            customer_name: stop.customer_name,
            customer_address: stop.customer_address,
            customer_phone: stop.customer_phone,
            items: stop.items,
            status: stop.status,
            recurring_order_id: Some(stop.recurring_order_id),
            is_recurring: stop.is_recurring,
            notes: Some(stop.notes),
            created_at: Utc::now(),
        };
        state.stops.push(created.clone());
        Ok(created)
    }

    async fn list_for_schedule(
        &self,
        schedule_id: ScheduleId,
    ) -> Result<Vec<DeliveryStop>, DeliveryStopRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .stops
            .iter()
            .filter(|stop| stop.master_schedule_id == schedule_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, StopStatus};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn customer(name: &str) -> CustomerSummary {
        CustomerSummary {
            id: CustomerId::random(),
            name: name.to_owned(),
            address: Some("1 Mill Lane".to_owned()),
            phone: None,
        }
    }

    fn order(customer: &CustomerSummary, day: Weekday, active: bool) -> RecurringOrder {
        RecurringOrder {
            id: RecurringOrderId::random(),
            customer_id: Some(customer.id),
            customer: None,
            items: "1 cord oak".to_owned(),
            frequency: Frequency::Weekly,
            preferred_day: Some(day),
            active,
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
                .single()
                .expect("valid instant"),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).expect("valid date")
    }

    #[fixture]
    fn store() -> InMemoryDispatchStore {
        InMemoryDispatchStore::new()
    }

    #[rstest]
    #[tokio::test]
    async fn listing_joins_customers_and_filters(store: InMemoryDispatchStore) {
        let alice = customer("Alice");
        store.insert_customer(alice.clone()).await;
        let monday = order(&alice, Weekday::Mon, true);
        store.insert_recurring_order(monday.clone()).await;
        store
            .insert_recurring_order(order(&alice, Weekday::Mon, false))
            .await;
        store
            .insert_recurring_order(order(&alice, Weekday::Tue, true))
            .await;

        let listed = store
            .list_active_for_weekday(Weekday::Mon)
            .await
            .expect("listing succeeds");

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, monday.id);
        assert_eq!(listed[0].customer.as_ref(), Some(&alice));
    }

    #[rstest]
    #[tokio::test]
    async fn removed_customers_leave_orders_unresolved(store: InMemoryDispatchStore) {
        let bob = customer("Bob");
        store.insert_customer(bob.clone()).await;
        store
            .insert_recurring_order(order(&bob, Weekday::Mon, true))
            .await;
        store.remove_customer(bob.id).await;

        let listed = store
            .list_active_for_weekday(Weekday::Mon)
            .await
            .expect("listing succeeds");

        assert_eq!(listed.len(), 1);
        assert!(listed[0].resolved_customer().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn second_schedule_for_a_date_conflicts(store: InMemoryDispatchStore) {
        let number = ScheduleNumber::for_date(date(1));
        let first = DispatchScheduleRepository::create(&store, date(1), &number)
            .await
            .expect("first create succeeds");
        assert_eq!(first.status, ScheduleStatus::Draft);

        let err = DispatchScheduleRepository::create(&store, date(1), &number)
            .await
            .expect_err("duplicate date conflicts");
        assert!(matches!(err, DispatchScheduleRepositoryError::Conflict { .. }));

        let found = store.find_by_date(date(1)).await.expect("lookup succeeds");
        assert_eq!(found, Some(first));
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_recurring_stops_conflict(store: InMemoryDispatchStore) {
        let carol = customer("Carol");
        let recurring = order(&carol, Weekday::Mon, true);
        let schedule = DispatchScheduleRepository::create(
            &store,
            date(1),
            &ScheduleNumber::for_date(date(1)),
        )
        .await
        .expect("schedule created");
        let stop = NewDeliveryStop::for_recurring_order(&schedule, &recurring, &carol);

        let created = DeliveryStopRepository::create(&store, stop.clone())
            .await
            .expect("first insert succeeds");
        assert_eq!(created.status, StopStatus::Pending);
        assert_eq!(created.notes.as_deref(), Some("Recurring weekly order"));

        let err = DeliveryStopRepository::create(&store, stop)
            .await
            .expect_err("second insert conflicts");
        assert!(matches!(err, DeliveryStopRepositoryError::Conflict { .. }));

        let found = store
            .find_for_recurring_order(schedule.id, recurring.id)
            .await
            .expect("lookup succeeds");
        assert_eq!(found, Some(created));
        assert_eq!(
            store
                .list_for_schedule(schedule.id)
                .await
                .expect("list succeeds")
                .len(),
            1
        );
    }

    #[rstest]
    #[tokio::test]
    async fn stops_require_an_existing_schedule(store: InMemoryDispatchStore) {
        let dave = customer("Dave");
        let recurring = order(&dave, Weekday::Mon, true);
        let orphan = MasterSchedule {
            id: ScheduleId::random(),
            schedule_number: ScheduleNumber::for_date(date(1)),
            schedule_date: date(1),
            status: ScheduleStatus::Draft,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let err = DeliveryStopRepository::create(
            &store,
            NewDeliveryStop::for_recurring_order(&orphan, &recurring, &dave),
        )
        .await
        .expect_err("orphan stop rejected");
        assert!(matches!(err, DeliveryStopRepositoryError::Query { .. }));
    }
}
