//! Doctor records.

use serde::{Deserialize, Serialize};

use crate::ids;

/// Availability status of a doctor. Doctors are never hard-deleted;
/// `Inactive` is the terminal-but-reversible state and always carries a
/// recorded reason.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DoctorStatus {
    Available,
    #[serde(rename = "On Leave")]
    OnLeave,
    Inactive,
}

/// A doctor profile as served by the clinic API.
///
/// The shift window fields are optional; consumers go through
/// [`ShiftWindows::for_doctor`](crate::schedule::ShiftWindows::for_doctor)
/// which applies the clinic defaults for unset or blank fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(rename = "_id", alias = "id", deserialize_with = "ids::deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "ids::deserialize_opt_id")]
    pub clinic_id: Option<String>,
    pub name: String,
    pub department: String,
    pub status: DoctorStatus,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub reg_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening_end: Option<String>,
    /// Deactivation reason, present while status is `Inactive`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Avatar: either an initial or an uploaded image URL.
    #[serde(default)]
    pub photo: String,
}

impl Doctor {
    /// Whether the doctor can currently take bookings.
    pub fn is_bookable(&self) -> bool {
        self.status != DoctorStatus::Inactive
    }
}

/// Normalize a doctor name to carry the `Dr. ` honorific exactly once.
pub fn with_honorific(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.starts_with("Dr.") {
        trimmed.to_string()
    } else {
        format!("Dr. {}", trimmed)
    }
}
