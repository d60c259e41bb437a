//! Appointment records and their stored/derived states.

use serde::{Deserialize, Serialize};

use crate::ids;

/// Stored appointment status.
///
/// `Completed` is set by the server after a visit; the client moves records
/// between the other three. "No-show" is deliberately not a variant: it is a
/// derived display state, see [`Appointment::is_no_show`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Pending and Confirmed both count as "open" bookings.
    pub fn is_open(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }
}

/// An appointment as served by the clinic API.
///
/// `patient_id`/`doctor_id` are references, not owned records; name lookups
/// go through the store. Dates and times are canonical strings aligned to the
/// slot grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id", alias = "id", deserialize_with = "ids::deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "ids::deserialize_opt_id")]
    pub clinic_id: Option<String>,
    #[serde(deserialize_with = "ids::deserialize_id")]
    pub patient_id: String,
    #[serde(deserialize_with = "ids::deserialize_id")]
    pub doctor_id: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Time of day, `HH:MM`, aligned to the slot grid.
    pub time: String,
    /// Free-text visit reason, e.g. "Consultation" or "Follow-up".
    #[serde(rename = "type", default)]
    pub visit_type: String,
    pub status: AppointmentStatus,
}

impl Appointment {
    /// Derived display state: an open appointment whose date has passed.
    /// Never written back; the stored status stays Pending/Confirmed.
    pub fn is_no_show(&self, today: &str) -> bool {
        self.status.is_open() && self.date.as_str() < today
    }

    /// Whether cancel/reschedule actions apply (open and not yet past).
    pub fn is_actionable(&self, today: &str) -> bool {
        self.status.is_open() && self.date.as_str() >= today
    }

    /// Whether the record can seed a rebook (cancelled, or a past no-show).
    pub fn is_rebookable(&self, today: &str) -> bool {
        self.status == AppointmentStatus::Cancelled || self.is_no_show(today)
    }
}
