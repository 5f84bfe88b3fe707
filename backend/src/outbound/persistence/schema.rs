//! Diesel table definitions for the dispatch schema.
//!
//! These must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Customer directory.
    customers (id) {
        /// Primary key.
        id -> Uuid,
        /// Display name.
        name -> Text,
        /// Delivery address.
        address -> Nullable<Text>,
        /// Contact phone number.
        phone -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Standing customer orders.
    ///
    /// `frequency` and `preferred_day` are free text maintained by
    /// back-office tooling and parsed leniently on read.
    recurring_orders (id) {
        /// Primary key.
        id -> Uuid,
        /// Customer reference; cleared if the customer is deleted.
        customer_id -> Nullable<Uuid>,
        /// Items to deliver.
        items -> Text,
        /// `weekly`, `biweekly` or `monthly`.
        frequency -> Text,
        /// Lowercase English weekday name.
        preferred_day -> Nullable<Text>,
        /// Inactive orders never fire.
        active_status -> Bool,
        /// Creation timestamp; anchors the biweekly phase.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One master schedule per calendar date (`UNIQUE (schedule_date)`).
    dispatch_schedules (id) {
        /// Primary key.
        id -> Uuid,
        /// Human-readable sequence number.
        schedule_number -> Text,
        /// Calendar date covered.
        schedule_date -> Date,
        /// `draft` or `submitted`.
        status -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Delivery stops, unique per `(master_schedule_id, recurring_order_id)`
    /// when `recurring_order_id` is set.
    delivery_stops (id) {
        /// Primary key.
        id -> Uuid,
        /// Owning schedule.
        master_schedule_id -> Uuid,
        /// Customer reference.
        customer_id -> Nullable<Uuid>,
        /// Customer name captured at creation.
        customer_name -> Text,
        /// Customer address captured at creation.
        customer_address -> Nullable<Text>,
        /// Customer phone captured at creation.
        customer_phone -> Nullable<Text>,
        /// Items to deliver.
        items -> Text,
        /// `pending`, `scheduled`, `completed` or `cancelled`.
        status -> Text,
        /// Spawning recurring order, null for manual stops.
        recurring_order_id -> Nullable<Uuid>,
        /// Whether the stop was generated.
        is_recurring -> Bool,
        /// Driver notes.
        notes -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(recurring_orders -> customers (customer_id));
diesel::joinable!(delivery_stops -> dispatch_schedules (master_schedule_id));

diesel::allow_tables_to_appear_in_same_query!(
    customers,
    recurring_orders,
    dispatch_schedules,
    delivery_stops,
);
