//! Recurring order definitions as read from the order registry.
//!
//! Orders are maintained by back-office tooling; this crate only reads them.
//! Parsing is deliberately total: malformed frequency or weekday values must
//! never stop other orders from syncing.

use std::fmt;

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::{CustomerId, CustomerSummary, RecurringOrderId};

/// Delivery cadence of a recurring order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Every occurrence of the preferred weekday.
    Weekly,
    /// Every other occurrence, phased from the order creation date.
    Biweekly,
    /// First occurrence of the preferred weekday in each month.
    Monthly,
    /// Stored value that matched no known cadence. Qualifies like weekly.
    Unrecognised(String),
}

impl Frequency {
    /// Parse a stored frequency value. Never fails.
    ///
    /// # Examples
    /// ```
    /// use firewood_dispatch::domain::Frequency;
    ///
    /// assert_eq!(Frequency::parse("Biweekly"), Frequency::Biweekly);
    /// assert_eq!(
    ///     Frequency::parse("fortnightly"),
    ///     Frequency::Unrecognised("fortnightly".to_owned())
    /// );
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "weekly" => Self::Weekly,
            "biweekly" => Self::Biweekly,
            "monthly" => Self::Monthly,
            _ => Self::Unrecognised(raw.to_owned()),
        }
    }

    /// Storage and display representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Unrecognised(raw) => raw.as_str(),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Frequency {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Frequency {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Parse a stored preferred-day value into a weekday.
///
/// English day names are accepted in any case. Blank or unknown values mean
/// the order has no preferred day and therefore never fires.
///
/// # Examples
/// ```
/// use chrono::Weekday;
/// use firewood_dispatch::domain::parse_preferred_day;
///
/// assert_eq!(parse_preferred_day("Monday"), Some(Weekday::Mon));
/// assert_eq!(parse_preferred_day("someday"), None);
/// ```
#[must_use]
pub fn parse_preferred_day(raw: &str) -> Option<Weekday> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Lowercase English name for a weekday, matching the stored form.
#[must_use]
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// A standing customer order that spawns delivery stops on a cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringOrder {
    /// Order identifier.
    pub id: RecurringOrderId,
    /// Customer reference; `None` when the registry row has no customer.
    pub customer_id: Option<CustomerId>,
    /// Joined customer record; `None` when the reference does not resolve.
    pub customer: Option<CustomerSummary>,
    /// Free-text description of what to deliver.
    pub items: String,
    /// Delivery cadence.
    pub frequency: Frequency,
    /// Weekday the order fires on, if any.
    #[serde(serialize_with = "serialize_preferred_day")]
    pub preferred_day: Option<Weekday>,
    /// Inactive orders never fire.
    pub active: bool,
    /// Creation timestamp; anchors the biweekly phase.
    pub created_at: DateTime<Utc>,
}

fn serialize_preferred_day<S: serde::Serializer>(
    day: &Option<Weekday>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match day {
        Some(weekday) => serializer.serialize_some(weekday_name(*weekday)),
        None => serializer.serialize_none(),
    }
}

impl RecurringOrder {
    /// Customer summary to denormalise onto a stop, if the reference resolves.
    #[must_use]
    pub fn resolved_customer(&self) -> Option<&CustomerSummary> {
        self.customer_id?;
        self.customer.as_ref()
    }
}
