//! Clinic profile and settings.

use serde::{Deserialize, Serialize};

/// A reusable message template. The body may contain `{patient_name}`,
/// `{doctor_name}`, `{time}` and `{date}` placeholders filled in elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageTemplate {
    pub title: String,
    pub text: String,
}

/// Clinic-level settings: identity, operating hours, templates and policies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    /// Free-text operating hours line, e.g. "09:00 AM - 06:00 PM".
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub templates: Vec<MessageTemplate>,
    #[serde(default)]
    pub policies: Vec<MessageTemplate>,
}

/// Identity marker read before every data fetch. Absence means "not signed
/// in" and short-circuits fetches without raising an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub clinic_id: String,
    pub user_name: String,
}
