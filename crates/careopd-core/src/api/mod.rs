//! The remote persistence contract.
//!
//! The clinic backend is an opaque JSON-over-HTTP collaborator. The core
//! never talks to the network itself: it calls an [`ApiClient`] and
//! reconciles local state from the responses. Two implementations exist:
//! [`memory::InMemoryApi`] for tests and the blocking HTTP adapter in the
//! `careopd-http` crate.

pub mod memory;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Appointment, AppointmentStatus, ClinicProfile, Doctor, DoctorStatus, Patient};

/// Fallback message when the server rejects a request without explaining.
pub const GENERIC_REJECTION: &str = "The server could not save the changes.";

/// Patient-select marker for the inline "add new patient" booking flow. The
/// wire keeps the marker in `patientId` and carries the details in
/// `newPatientData`, as the backend expects.
pub const NEW_PATIENT_MARKER: &str = "add_new";

/// Errors crossing the API boundary.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The server answered with a non-success status. The server's message,
    /// when present, is surfaced verbatim.
    #[error("{}", .message.as_deref().unwrap_or(GENERIC_REJECTION))]
    Rejection { message: Option<String> },

    /// The request never completed (connectivity, timeout, malformed body).
    #[error("Server error: Could not connect to backend.")]
    Transport { detail: String },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Details for a patient created inline during booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPatientData {
    pub name: String,
    pub phone: String,
    pub age: u32,
    pub gender: String,
    pub address: String,
}

/// Create-appointment request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub clinic_id: String,
    /// An existing patient id, or [`NEW_PATIENT_MARKER`].
    pub patient_id: String,
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    #[serde(rename = "type")]
    pub visit_type: String,
    pub status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_patient_data: Option<NewPatientData>,
}

/// Create-appointment response: the stored appointment plus the patient the
/// server created for an inline booking, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentResponse {
    pub appointment: Appointment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_patient: Option<Patient>,
}

/// Partial appointment update. Unset fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub visit_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl AppointmentPatch {
    /// Patch setting only the status.
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Create/update doctor request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPayload {
    pub clinic_id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub gender: String,
    pub address: String,
    pub department: String,
    pub qualification: String,
    pub experience: String,
    pub reg_no: String,
    pub morning_start: String,
    pub morning_end: String,
    pub evening_start: String,
    pub evening_end: String,
    pub status: DoctorStatus,
    pub photo: String,
}

/// Partial doctor update: profile edits, status toggles, deactivation with
/// reason. Unset fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morning_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morning_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evening_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evening_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DoctorStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl DoctorPatch {
    /// Patch setting only the status.
    pub fn status(status: DoctorStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Create/update patient request body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    pub clinic_id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub phone: String,
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
    pub patient_type: crate::models::PatientType,
    pub last_visit: String,
}

/// Partial clinic settings update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClinicPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<Vec<crate::models::MessageTemplate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<crate::models::MessageTemplate>>,
}

/// The clinic backend's CRUD surface. Calls block the current operation
/// only; the surrounding shell stays responsive. No retries, no timeouts:
/// a failure reports once and leaves local state untouched.
pub trait ApiClient {
    fn list_appointments(&self, clinic_id: &str) -> ApiResult<Vec<Appointment>>;
    fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> ApiResult<CreateAppointmentResponse>;
    fn update_appointment(
        &self,
        appointment_id: &str,
        patch: &AppointmentPatch,
    ) -> ApiResult<Appointment>;

    fn list_doctors(&self, clinic_id: &str) -> ApiResult<Vec<Doctor>>;
    fn create_doctor(&self, payload: &DoctorPayload) -> ApiResult<Doctor>;
    fn update_doctor(&self, doctor_id: &str, patch: &DoctorPatch) -> ApiResult<Doctor>;

    fn list_patients(&self, clinic_id: &str) -> ApiResult<Vec<Patient>>;
    fn create_patient(&self, payload: &PatientPayload) -> ApiResult<Patient>;
    fn update_patient(&self, patient_id: &str, payload: &PatientPayload) -> ApiResult<Patient>;

    fn get_clinic(&self, clinic_id: &str) -> ApiResult<ClinicProfile>;
    fn update_clinic(&self, clinic_id: &str, patch: &ClinicPatch) -> ApiResult<ClinicProfile>;
}

/// Delegation so callers can hand a shared reference to the lifecycle
/// manager and keep their own handle (tests do this with the in-memory
/// backend).
impl<T: ApiClient + ?Sized> ApiClient for &T {
    fn list_appointments(&self, clinic_id: &str) -> ApiResult<Vec<Appointment>> {
        (**self).list_appointments(clinic_id)
    }

    fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> ApiResult<CreateAppointmentResponse> {
        (**self).create_appointment(request)
    }

    fn update_appointment(
        &self,
        appointment_id: &str,
        patch: &AppointmentPatch,
    ) -> ApiResult<Appointment> {
        (**self).update_appointment(appointment_id, patch)
    }

    fn list_doctors(&self, clinic_id: &str) -> ApiResult<Vec<Doctor>> {
        (**self).list_doctors(clinic_id)
    }

    fn create_doctor(&self, payload: &DoctorPayload) -> ApiResult<Doctor> {
        (**self).create_doctor(payload)
    }

    fn update_doctor(&self, doctor_id: &str, patch: &DoctorPatch) -> ApiResult<Doctor> {
        (**self).update_doctor(doctor_id, patch)
    }

    fn list_patients(&self, clinic_id: &str) -> ApiResult<Vec<Patient>> {
        (**self).list_patients(clinic_id)
    }

    fn create_patient(&self, payload: &PatientPayload) -> ApiResult<Patient> {
        (**self).create_patient(payload)
    }

    fn update_patient(&self, patient_id: &str, payload: &PatientPayload) -> ApiResult<Patient> {
        (**self).update_patient(patient_id, payload)
    }

    fn get_clinic(&self, clinic_id: &str) -> ApiResult<ClinicProfile> {
        (**self).get_clinic(clinic_id)
    }

    fn update_clinic(&self, clinic_id: &str, patch: &ClinicPatch) -> ApiResult<ClinicProfile> {
        (**self).update_clinic(clinic_id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_verbatim() {
        let err = ApiError::Rejection {
            message: Some("Slot already taken".into()),
        };
        assert_eq!(err.to_string(), "Slot already taken");

        let err = ApiError::Rejection { message: None };
        assert_eq!(err.to_string(), GENERIC_REJECTION);
    }

    #[test]
    fn test_patch_omits_unset_fields() {
        let patch = AppointmentPatch::status(AppointmentStatus::Cancelled);
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"status":"Cancelled"}"#);
    }
}
