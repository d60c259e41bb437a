//! Patient records.

use serde::{Deserialize, Serialize};

use crate::ids;

/// Sentinel value stored in `last_visit` for a patient who has never visited.
pub const NO_VISIT: &str = "-";

/// New/returning classification. Maintained by the server after visits; the
/// client only ever sets `New` when creating a patient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PatientType {
    New,
    Returning,
}

/// A patient record as served by the clinic API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "_id", alias = "id", deserialize_with = "ids::deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "ids::deserialize_opt_id")]
    pub clinic_id: Option<String>,
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub insurance_provider: String,
    #[serde(default)]
    pub insurance_id: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(rename = "type")]
    pub patient_type: PatientType,
    /// Canonical date of the last completed visit, or [`NO_VISIT`].
    #[serde(default = "default_last_visit")]
    pub last_visit: String,
}

fn default_last_visit() -> String {
    NO_VISIT.to_string()
}

impl Patient {
    /// Whether the patient has ever visited the clinic.
    pub fn has_visited(&self) -> bool {
        self.last_visit != NO_VISIT && !self.last_visit.is_empty()
    }
}
