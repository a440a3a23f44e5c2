//! Appointment records as read from the data store.
//!
//! The engine never owns or mutates appointments. Callers hand over a
//! snapshot, deserialized from the same row shape the store returns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ViewingError};
use crate::interval::TimeInterval;

/// Which side of the transaction the customer is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    #[default]
    Buyer,
    Seller,
    Tenant,
    Landlord,
}

impl PartyRole {
    /// Fallback display label when an appointment has no customer name.
    pub fn label(self) -> &'static str {
        match self {
            PartyRole::Buyer => "Buyer",
            PartyRole::Seller => "Seller",
            PartyRole::Tenant => "Tenant",
            PartyRole::Landlord => "Landlord",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

/// Identifies whose session an appointment belongs to.
///
/// Appointments without a customer group get a key derived from their own id,
/// so two ungrouped appointments never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PartyKey {
    Group(String),
    Solo(String),
}

impl fmt::Display for PartyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartyKey::Group(id) => write!(f, "group:{id}"),
            PartyKey::Solo(id) => write!(f, "solo:{id}"),
        }
    }
}

/// A viewing appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub property_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_group_name: Option<String>,
    /// Free-text customer description for appointments outside any group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub party_role: PartyRole,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub interval: TimeInterval,
}

impl Appointment {
    /// A scheduled appointment with no customer details.
    pub fn new(id: impl Into<String>, property_id: impl Into<String>, interval: TimeInterval) -> Self {
        Self {
            id: id.into(),
            property_id: property_id.into(),
            customer_group_id: None,
            customer_group_name: None,
            customer_info: None,
            customer_phone: None,
            party_role: PartyRole::default(),
            status: AppointmentStatus::default(),
            notes: None,
            interval,
        }
    }

    pub fn with_group(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.customer_group_id = Some(id.into());
        self.customer_group_name = Some(name.into());
        self
    }

    pub fn with_customer_info(mut self, info: impl Into<String>) -> Self {
        self.customer_info = Some(info.into());
        self
    }

    pub fn with_role(mut self, role: PartyRole) -> Self {
        self.party_role = role;
        self
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    /// Blank group ids count as no group.
    pub fn party_key(&self) -> PartyKey {
        match non_blank(self.customer_group_id.as_deref()) {
            Some(group) => PartyKey::Group(group.to_string()),
            None => PartyKey::Solo(self.id.clone()),
        }
    }

    /// Group name, then customer info, then the role label.
    pub fn display_name(&self) -> String {
        non_blank(self.customer_group_name.as_deref())
            .or_else(|| non_blank(self.customer_info.as_deref()))
            .unwrap_or_else(|| self.party_role.label())
            .to_string()
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == AppointmentStatus::Scheduled
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// Deserialize a JSON array of appointment rows.
///
/// # Errors
///
/// Returns [`ViewingError::InvalidRecord`] if the input is not an array of
/// well-formed records (including unparseable timestamps).
pub fn parse_appointments(json: &str) -> Result<Vec<Appointment>> {
    serde_json::from_str(json).map_err(|e| ViewingError::InvalidRecord(e.to_string()))
}

// ── Booked ──────────────────────────────────────────────────────────────────

/// Anything that occupies a window on the agent's calendar.
pub trait Booked {
    fn booking_id(&self) -> &str;

    fn booked_interval(&self) -> TimeInterval;

    /// Inactive bookings never block a new one.
    fn is_active(&self) -> bool {
        true
    }
}

impl Booked for Appointment {
    fn booking_id(&self) -> &str {
        &self.id
    }

    fn booked_interval(&self) -> TimeInterval {
        self.interval
    }

    fn is_active(&self) -> bool {
        self.is_scheduled()
    }
}

/// The minimal `{id, interval}` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    #[serde(flatten)]
    pub interval: TimeInterval,
}

impl Booking {
    pub fn new(id: impl Into<String>, interval: TimeInterval) -> Self {
        Self {
            id: id.into(),
            interval,
        }
    }
}

impl Booked for Booking {
    fn booking_id(&self) -> &str {
        &self.id
    }

    fn booked_interval(&self) -> TimeInterval {
        self.interval
    }
}
