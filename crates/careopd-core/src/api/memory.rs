//! In-memory [`ApiClient`] for tests.
//!
//! Behaves like a permissive backend: it mints ids, honors partial patches
//! and never enforces the patient-conflict invariant; that gate belongs to
//! the client, and the tests need a server that lets them prove it.

use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use super::{
    ApiClient, ApiError, ApiResult, AppointmentPatch, ClinicPatch, CreateAppointmentRequest,
    CreateAppointmentResponse, DoctorPatch, DoctorPayload, PatientPayload,
};
use crate::ids;
use crate::models::{
    Appointment, ClinicProfile, Doctor, DoctorStatus, Patient, PatientType, NO_VISIT,
};

#[derive(Default)]
struct State {
    appointments: Vec<Appointment>,
    doctors: Vec<Doctor>,
    patients: Vec<Patient>,
    clinic: ClinicProfile,
    fail_next: Option<ApiError>,
    write_calls: u32,
}

/// In-memory clinic backend.
#[derive(Default)]
pub struct InMemoryApi {
    state: Mutex<State>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means a test thread panicked mid-call; the
        // data is still usable for assertions.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue an error for the next write call.
    pub fn fail_next(&self, error: ApiError) {
        self.state().fail_next = Some(error);
    }

    /// Number of write (create/update) calls seen so far.
    pub fn write_calls(&self) -> u32 {
        self.state().write_calls
    }

    pub fn seed_appointment(&self, appointment: Appointment) {
        self.state().appointments.push(appointment);
    }

    pub fn seed_doctor(&self, doctor: Doctor) {
        self.state().doctors.push(doctor);
    }

    pub fn seed_patient(&self, patient: Patient) {
        self.state().patients.push(patient);
    }

    pub fn set_clinic(&self, clinic: ClinicProfile) {
        self.state().clinic = clinic;
    }

    /// Snapshot of the stored appointments, for assertions.
    pub fn appointments(&self) -> Vec<Appointment> {
        self.state().appointments.clone()
    }

    fn write_gate(state: &mut State) -> ApiResult<()> {
        state.write_calls += 1;
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ApiClient for InMemoryApi {
    fn list_appointments(&self, _clinic_id: &str) -> ApiResult<Vec<Appointment>> {
        Ok(self.state().appointments.clone())
    }

    fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> ApiResult<CreateAppointmentResponse> {
        let mut state = self.state();
        Self::write_gate(&mut state)?;

        let new_patient = request.new_patient_data.as_ref().map(|data| Patient {
            id: Uuid::new_v4().to_string(),
            clinic_id: Some(request.clinic_id.clone()),
            name: data.name.clone(),
            age: data.age,
            gender: data.gender.clone(),
            phone: data.phone.clone(),
            address: data.address.clone(),
            email: String::new(),
            blood_group: String::new(),
            insurance_provider: String::new(),
            insurance_id: String::new(),
            expiry_date: String::new(),
            patient_type: PatientType::New,
            last_visit: NO_VISIT.to_string(),
        });

        let patient_id = match &new_patient {
            Some(p) => p.id.clone(),
            None => request.patient_id.clone(),
        };

        let appointment = Appointment {
            id: Uuid::new_v4().to_string(),
            clinic_id: Some(request.clinic_id.clone()),
            patient_id,
            doctor_id: request.doctor_id.clone(),
            date: request.date.clone(),
            time: request.time.clone(),
            visit_type: request.visit_type.clone(),
            status: request.status,
        };

        if let Some(p) = &new_patient {
            state.patients.push(p.clone());
        }
        state.appointments.push(appointment.clone());

        Ok(CreateAppointmentResponse {
            appointment,
            new_patient,
        })
    }

    fn update_appointment(
        &self,
        appointment_id: &str,
        patch: &AppointmentPatch,
    ) -> ApiResult<Appointment> {
        let mut state = self.state();
        Self::write_gate(&mut state)?;

        let appointment = state
            .appointments
            .iter_mut()
            .find(|a| ids::same(&a.id, appointment_id))
            .ok_or_else(|| ApiError::Rejection {
                message: Some("Appointment not found".into()),
            })?;

        if let Some(v) = &patch.patient_id {
            appointment.patient_id = v.clone();
        }
        if let Some(v) = &patch.doctor_id {
            appointment.doctor_id = v.clone();
        }
        if let Some(v) = &patch.date {
            appointment.date = v.clone();
        }
        if let Some(v) = &patch.time {
            appointment.time = v.clone();
        }
        if let Some(v) = &patch.visit_type {
            appointment.visit_type = v.clone();
        }
        if let Some(v) = patch.status {
            appointment.status = v;
        }

        Ok(appointment.clone())
    }

    fn list_doctors(&self, _clinic_id: &str) -> ApiResult<Vec<Doctor>> {
        Ok(self.state().doctors.clone())
    }

    fn create_doctor(&self, payload: &DoctorPayload) -> ApiResult<Doctor> {
        let mut state = self.state();
        Self::write_gate(&mut state)?;

        let doctor = Doctor {
            id: Uuid::new_v4().to_string(),
            clinic_id: Some(payload.clinic_id.clone()),
            name: payload.name.clone(),
            department: payload.department.clone(),
            status: payload.status,
            phone: payload.phone.clone(),
            email: payload.email.clone(),
            gender: payload.gender.clone(),
            address: payload.address.clone(),
            qualification: payload.qualification.clone(),
            experience: payload.experience.clone(),
            reg_no: payload.reg_no.clone(),
            morning_start: Some(payload.morning_start.clone()),
            morning_end: Some(payload.morning_end.clone()),
            evening_start: Some(payload.evening_start.clone()),
            evening_end: Some(payload.evening_end.clone()),
            reason: None,
            photo: payload.photo.clone(),
        };
        state.doctors.push(doctor.clone());
        Ok(doctor)
    }

    fn update_doctor(&self, doctor_id: &str, patch: &DoctorPatch) -> ApiResult<Doctor> {
        let mut state = self.state();
        Self::write_gate(&mut state)?;

        let doctor = state
            .doctors
            .iter_mut()
            .find(|d| ids::same(&d.id, doctor_id))
            .ok_or_else(|| ApiError::Rejection {
                message: Some("Doctor not found".into()),
            })?;

        if let Some(v) = &patch.name {
            doctor.name = v.clone();
        }
        if let Some(v) = &patch.phone {
            doctor.phone = v.clone();
        }
        if let Some(v) = &patch.email {
            doctor.email = v.clone();
        }
        if let Some(v) = &patch.gender {
            doctor.gender = v.clone();
        }
        if let Some(v) = &patch.address {
            doctor.address = v.clone();
        }
        if let Some(v) = &patch.department {
            doctor.department = v.clone();
        }
        if let Some(v) = &patch.qualification {
            doctor.qualification = v.clone();
        }
        if let Some(v) = &patch.experience {
            doctor.experience = v.clone();
        }
        if let Some(v) = &patch.reg_no {
            doctor.reg_no = v.clone();
        }
        if let Some(v) = &patch.morning_start {
            doctor.morning_start = Some(v.clone());
        }
        if let Some(v) = &patch.morning_end {
            doctor.morning_end = Some(v.clone());
        }
        if let Some(v) = &patch.evening_start {
            doctor.evening_start = Some(v.clone());
        }
        if let Some(v) = &patch.evening_end {
            doctor.evening_end = Some(v.clone());
        }
        if let Some(v) = &patch.photo {
            doctor.photo = v.clone();
        }
        if let Some(status) = patch.status {
            doctor.status = status;
            // Reactivation clears the stored deactivation reason.
            if status != DoctorStatus::Inactive {
                doctor.reason = None;
            }
        }
        if let Some(v) = &patch.reason {
            doctor.reason = Some(v.clone());
        }

        Ok(doctor.clone())
    }

    fn list_patients(&self, _clinic_id: &str) -> ApiResult<Vec<Patient>> {
        Ok(self.state().patients.clone())
    }

    fn create_patient(&self, payload: &PatientPayload) -> ApiResult<Patient> {
        let mut state = self.state();
        Self::write_gate(&mut state)?;

        let patient = Patient {
            id: Uuid::new_v4().to_string(),
            clinic_id: Some(payload.clinic_id.clone()),
            name: payload.name.clone(),
            age: payload.age,
            gender: payload.gender.clone(),
            phone: payload.phone.clone(),
            address: payload.address.clone(),
            email: payload.email.clone(),
            blood_group: payload.blood_group.clone(),
            insurance_provider: payload.insurance_provider.clone(),
            insurance_id: payload.insurance_id.clone(),
            expiry_date: payload.expiry_date.clone(),
            patient_type: payload.patient_type,
            last_visit: payload.last_visit.clone(),
        };
        state.patients.push(patient.clone());
        Ok(patient)
    }

    fn update_patient(&self, patient_id: &str, payload: &PatientPayload) -> ApiResult<Patient> {
        let mut state = self.state();
        Self::write_gate(&mut state)?;

        let patient = state
            .patients
            .iter_mut()
            .find(|p| ids::same(&p.id, patient_id))
            .ok_or_else(|| ApiError::Rejection {
                message: Some("Patient not found".into()),
            })?;

        patient.name = payload.name.clone();
        patient.age = payload.age;
        patient.gender = payload.gender.clone();
        patient.phone = payload.phone.clone();
        patient.address = payload.address.clone();
        patient.email = payload.email.clone();
        patient.blood_group = payload.blood_group.clone();
        patient.insurance_provider = payload.insurance_provider.clone();
        patient.insurance_id = payload.insurance_id.clone();
        patient.expiry_date = payload.expiry_date.clone();
        patient.patient_type = payload.patient_type;
        patient.last_visit = payload.last_visit.clone();

        Ok(patient.clone())
    }

    fn get_clinic(&self, _clinic_id: &str) -> ApiResult<ClinicProfile> {
        Ok(self.state().clinic.clone())
    }

    fn update_clinic(&self, _clinic_id: &str, patch: &ClinicPatch) -> ApiResult<ClinicProfile> {
        let mut state = self.state();
        Self::write_gate(&mut state)?;

        if let Some(v) = &patch.name {
            state.clinic.name = v.clone();
        }
        if let Some(v) = &patch.address {
            state.clinic.address = v.clone();
        }
        if let Some(v) = &patch.phone {
            state.clinic.phone = v.clone();
        }
        if let Some(v) = &patch.email {
            state.clinic.email = v.clone();
        }
        if let Some(v) = &patch.hours {
            state.clinic.hours = v.clone();
        }
        if let Some(v) = &patch.templates {
            state.clinic.templates = v.clone();
        }
        if let Some(v) = &patch.policies {
            state.clinic.policies = v.clone();
        }

        Ok(state.clinic.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NewPatientData;
    use crate::models::AppointmentStatus;

    fn create_request() -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            clinic_id: "c1".into(),
            patient_id: "p1".into(),
            doctor_id: "d1".into(),
            date: "2024-06-15".into(),
            time: "09:00".into(),
            visit_type: "Consultation".into(),
            status: AppointmentStatus::Pending,
            new_patient_data: None,
        }
    }

    #[test]
    fn test_create_assigns_id() {
        let api = InMemoryApi::new();
        let created = api.create_appointment(&create_request()).unwrap();
        assert_eq!(created.appointment.id.len(), 36);
        assert!(created.new_patient.is_none());
        assert_eq!(api.appointments().len(), 1);
    }

    #[test]
    fn test_create_with_inline_patient() {
        let api = InMemoryApi::new();
        let mut request = create_request();
        request.patient_id = crate::api::NEW_PATIENT_MARKER.into();
        request.new_patient_data = Some(NewPatientData {
            name: "Jane Roe".into(),
            phone: "555-2222".into(),
            age: 28,
            gender: "F".into(),
            address: "456 Oak St".into(),
        });

        let created = api.create_appointment(&request).unwrap();
        let patient = created.new_patient.unwrap();
        assert_eq!(patient.patient_type, PatientType::New);
        assert_eq!(patient.last_visit, NO_VISIT);
        assert_eq!(created.appointment.patient_id, patient.id);
    }

    #[test]
    fn test_fail_next_is_one_shot() {
        let api = InMemoryApi::new();
        api.fail_next(ApiError::Transport {
            detail: "down".into(),
        });
        assert!(api.create_appointment(&create_request()).is_err());
        assert!(api.create_appointment(&create_request()).is_ok());
        assert_eq!(api.write_calls(), 2);
    }

    #[test]
    fn test_update_merges_patch() {
        let api = InMemoryApi::new();
        let created = api.create_appointment(&create_request()).unwrap();
        let updated = api
            .update_appointment(
                &created.appointment.id,
                &AppointmentPatch {
                    date: Some("2024-06-16".into()),
                    time: Some("10:00".into()),
                    status: Some(AppointmentStatus::Confirmed),
                    ..AppointmentPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.date, "2024-06-16");
        assert_eq!(updated.status, AppointmentStatus::Confirmed);
        assert_eq!(updated.patient_id, "p1");
    }
}
