//! Customer directory read model consumed by the sync engine.

use serde::{Deserialize, Serialize};

use super::CustomerId;

/// Contact details copied onto delivery stops at creation time.
///
/// Stops keep their own copy so later edits to the customer record do not
/// rewrite delivery history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    /// Customer identifier.
    pub id: CustomerId,
    /// Display name used by drivers.
    pub name: String,
    /// Delivery address, when recorded.
    pub address: Option<String>,
    /// Contact phone number, when recorded.
    pub phone: Option<String>,
}
