//! Blocking JSON-over-HTTP implementation of the core's [`ApiClient`].
//!
//! Maps the deployment's REST surface onto the core contract:
//!
//! | Operation            | Method | Path                          |
//! |----------------------|--------|-------------------------------|
//! | List appointments    | GET    | `/api/appointments/{clinic}`  |
//! | Create appointment   | POST   | `/api/appointments`           |
//! | Update appointment   | PUT    | `/api/appointments/{id}`      |
//! | List/create/update doctors and patients follow the same shape.  |
//! | Clinic settings      | GET/PUT| `/api/clinics/{clinic}`       |
//!
//! Non-success responses become [`ApiError::Rejection`] carrying the body's
//! `error` message when present; everything that never produces a response
//! becomes [`ApiError::Transport`].

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use careopd_core::api::{
    ApiClient, ApiError, ApiResult, AppointmentPatch, ClinicPatch, CreateAppointmentRequest,
    CreateAppointmentResponse, DoctorPatch, DoctorPayload, PatientPayload,
};
use careopd_core::models::{Appointment, ClinicProfile, Doctor, Patient};

/// Error body shape used by the backend for rejected requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Blocking HTTP client for the clinic backend.
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client against a base URL such as `https://api.example.com`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .map_err(transport)?;
        decode(response)
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        debug!(path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .map_err(transport)?;
        decode(response)
    }

    fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ApiResult<T> {
        debug!(path, "PUT");
        let response = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .map_err(transport)?;
        decode(response)
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport {
        detail: err.to_string(),
    }
}

fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    if response.status().is_success() {
        response.json().map_err(transport)
    } else {
        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.error);
        Err(ApiError::Rejection { message })
    }
}

impl ApiClient for HttpApi {
    fn list_appointments(&self, clinic_id: &str) -> ApiResult<Vec<Appointment>> {
        self.get(&format!("/api/appointments/{}", clinic_id))
    }

    fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> ApiResult<CreateAppointmentResponse> {
        self.post("/api/appointments", request)
    }

    fn update_appointment(
        &self,
        appointment_id: &str,
        patch: &AppointmentPatch,
    ) -> ApiResult<Appointment> {
        self.put(&format!("/api/appointments/{}", appointment_id), patch)
    }

    fn list_doctors(&self, clinic_id: &str) -> ApiResult<Vec<Doctor>> {
        self.get(&format!("/api/doctors/{}", clinic_id))
    }

    fn create_doctor(&self, payload: &DoctorPayload) -> ApiResult<Doctor> {
        self.post("/api/doctors", payload)
    }

    fn update_doctor(&self, doctor_id: &str, patch: &DoctorPatch) -> ApiResult<Doctor> {
        self.put(&format!("/api/doctors/{}", doctor_id), patch)
    }

    fn list_patients(&self, clinic_id: &str) -> ApiResult<Vec<Patient>> {
        self.get(&format!("/api/patients/{}", clinic_id))
    }

    fn create_patient(&self, payload: &PatientPayload) -> ApiResult<Patient> {
        self.post("/api/patients", payload)
    }

    fn update_patient(&self, patient_id: &str, payload: &PatientPayload) -> ApiResult<Patient> {
        self.put(&format!("/api/patients/{}", patient_id), payload)
    }

    fn get_clinic(&self, clinic_id: &str) -> ApiResult<ClinicProfile> {
        self.get(&format!("/api/clinics/{}", clinic_id))
    }

    fn update_clinic(&self, clinic_id: &str, patch: &ClinicPatch) -> ApiResult<ClinicProfile> {
        self.put(&format!("/api/clinics/{}", clinic_id), patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = HttpApi::new("http://localhost:5000/");
        assert_eq!(api.url("/api/doctors/c1"), "http://localhost:5000/api/doctors/c1");
    }
}
