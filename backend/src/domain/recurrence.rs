//! Frequency qualification: does a recurring order fire on a given date?
//!
//! The rules are evaluated on calendar dates only. Weekdays come from
//! `chrono`'s proleptic Gregorian calendar, so results never depend on the
//! server locale or time zone.

use chrono::{Datelike, NaiveDate, Weekday};

use super::{Frequency, RecurringOrder};

/// Decide whether `order` produces a delivery stop on `target`.
///
/// Inactive orders and orders whose preferred day differs from the target
/// weekday never qualify. Past that gate, weekly orders always qualify,
/// biweekly orders qualify on even week offsets from their creation date and
/// monthly orders qualify on the first matching weekday of the month.
/// Unrecognised frequencies qualify like weekly orders.
///
/// # Examples
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc, Weekday};
/// use firewood_dispatch::domain::{
///     Frequency, RecurringOrder, RecurringOrderId, recurrence,
/// };
///
/// let order = RecurringOrder {
///     id: RecurringOrderId::random(),
///     customer_id: None,
///     customer: None,
///     items: "Half load hardwood".to_owned(),
///     frequency: Frequency::Biweekly,
///     preferred_day: Some(Weekday::Mon),
///     active: true,
///     created_at: Utc
///         .with_ymd_and_hms(2024, 1, 1, 9, 30, 0)
///         .single()
///         .expect("valid instant"),
/// };
/// let jan_15 = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
/// let jan_22 = NaiveDate::from_ymd_opt(2024, 1, 22).expect("valid date");
/// assert!(recurrence::qualifies(&order, jan_15));
/// assert!(!recurrence::qualifies(&order, jan_22));
/// ```
#[must_use]
pub fn qualifies(order: &RecurringOrder, target: NaiveDate) -> bool {
    if !order.active || order.preferred_day != Some(target.weekday()) {
        return false;
    }

    match &order.frequency {
        Frequency::Weekly | Frequency::Unrecognised(_) => true,
        Frequency::Biweekly => biweekly_in_phase(order.created_at.date_naive(), target),
        Frequency::Monthly => is_first_weekday_of_month(target),
    }
}

/// Whether `target` lies an even number of whole weeks from `anchor`.
///
/// Week counts use floor division, so dates before the anchor keep the same
/// alternating phase instead of flipping at zero.
#[must_use]
pub fn biweekly_in_phase(anchor: NaiveDate, target: NaiveDate) -> bool {
    let days = target.signed_duration_since(anchor).num_days();
    days.div_euclid(7).rem_euclid(2) == 0
}

/// First date in `year`/`month` that falls on `weekday`.
///
/// Returns `None` only when the month itself is out of chrono's range.
#[must_use]
pub fn first_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let mut candidate = NaiveDate::from_ymd_opt(year, month, 1)?;
    while candidate.weekday() != weekday {
        candidate = candidate.succ_opt()?;
    }
    Some(candidate)
}

fn is_first_weekday_of_month(target: NaiveDate) -> bool {
    first_weekday_of_month(target.year(), target.month(), target.weekday())
        .is_some_and(|first| first.day() == target.day())
}
