//! The appointment lifecycle manager.
//!
//! [`FrontOffice`] owns the store for a session and coordinates every
//! mutation: validate locally, run the conflict gate, call the API, and only
//! then reconcile local state from the response body. A failed call leaves
//! the store exactly as it was.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{
    ApiClient, ApiError, AppointmentPatch, ClinicPatch, CreateAppointmentRequest, DoctorPatch,
    DoctorPayload, NewPatientData, PatientPayload, NEW_PATIENT_MARKER,
};
use crate::models::{
    with_honorific, Appointment, AppointmentStatus, DoctorStatus, Notification, NotificationKind,
    Patient, PatientType, Session, NO_VISIT,
};
use crate::schedule;
use crate::store::{Action, ClinicStore};
use crate::timefmt;

/// Form fields that can carry an invalid marker, for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Patient,
    NewPatientName,
    NewPatientPhone,
    NewPatientAge,
    NewPatientAddress,
    Doctor,
    Date,
    Time,
    Name,
    Age,
    Phone,
    Email,
    Address,
    Department,
    Qualification,
    Experience,
    RegNo,
    MorningStart,
    MorningEnd,
    EveningStart,
    EveningEnd,
    Reason,
}

/// Operation failures, each reducible to one display string.
///
/// `Validation` and `Conflict` are raised locally, before anything goes on
/// the wire. `Remote` carries the server's message verbatim (or the generic
/// fallback); `Connection` is a transport failure. Nothing is retried and
/// nothing is fatal: every failure degrades to "show message, let the user
/// try again".
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OfficeError {
    #[error("{message}")]
    Validation {
        message: String,
        fields: Vec<FormField>,
    },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Remote(String),
    #[error("{0}")]
    Connection(String),
}

impl From<ApiError> for OfficeError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Rejection { .. } => OfficeError::Remote(err.to_string()),
            ApiError::Transport { .. } => OfficeError::Connection(err.to_string()),
        }
    }
}

fn required(message: &str, fields: Vec<FormField>) -> OfficeError {
    OfficeError::Validation {
        message: message.to_string(),
        fields,
    }
}

const FILL_REQUIRED: &str = "Please fill all required details marked with *";

/// Result of a data fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Loaded,
    /// No session marker: fetches short-circuit, which is not an error.
    NotSignedIn,
}

/// Patient choice on the booking form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PatientSelection {
    #[default]
    Unset,
    /// Book for an existing patient.
    Existing(String),
    /// Create the patient inline as part of the booking.
    AddNew,
}

/// Inline new-patient sub-form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPatientDraft {
    pub name: String,
    pub phone: String,
    pub age: Option<u32>,
    pub gender: String,
    pub address: String,
}

/// The booking form, for fresh bookings and rebooks alike.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub patient: PatientSelection,
    pub new_patient: NewPatientDraft,
    pub department: String,
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    /// Visit reason; defaults to "Consultation" on submit when empty.
    pub visit_type: String,
    /// Present when this submission reuses an existing record (future
    /// cancelled rebook); absent for fresh bookings and past-date clones.
    pub rebooking_id: Option<String>,
}

/// How a rebook will be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebookMode {
    /// Source date already passed: submit as a brand-new record.
    Clone,
    /// Source is still in the future (a cancelled slot): update in place.
    ReuseRecord,
}

/// A prefilled booking form plus the commit mode for a rebook.
#[derive(Debug, Clone, PartialEq)]
pub struct RebookPlan {
    pub form: BookingForm,
    pub mode: RebookMode,
}

impl RebookPlan {
    /// Prefill from a source appointment: same patient, doctor and
    /// department, today's date, time cleared. Strictly-past sources clone
    /// into a new record; anything else reuses the original record.
    pub fn from_source(source: &Appointment, department: &str, today: &str) -> Self {
        let mode = if source.date.as_str() < today {
            RebookMode::Clone
        } else {
            RebookMode::ReuseRecord
        };
        let form = BookingForm {
            patient: PatientSelection::Existing(source.patient_id.clone()),
            new_patient: NewPatientDraft::default(),
            department: department.to_string(),
            doctor_id: source.doctor_id.clone(),
            date: today.to_string(),
            time: String::new(),
            visit_type: source.visit_type.clone(),
            rebooking_id: match mode {
                RebookMode::Clone => None,
                RebookMode::ReuseRecord => Some(source.id.clone()),
            },
        };
        Self { form, mode }
    }
}

/// Doctor create/edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorForm {
    /// Present when editing an existing doctor.
    pub id: Option<String>,
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
    pub status: Option<DoctorStatus>,
    pub photo: String,
}

/// Patient create/edit form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientForm {
    /// Present when editing an existing patient.
    pub id: Option<String>,
    pub name: String,
    pub age: Option<u32>,
    pub gender: String,
    pub phone: String,
    pub address: String,
    pub email: String,
    pub blood_group: String,
    pub insurance_provider: String,
    pub insurance_id: String,
    pub expiry_date: String,
}

/// The front-office session: the store plus its API collaborator.
pub struct FrontOffice<A: ApiClient> {
    api: A,
    store: ClinicStore,
}

impl<A: ApiClient> FrontOffice<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            store: ClinicStore::new(),
        }
    }

    pub fn with_session(api: A, session: Session) -> Self {
        let mut office = Self::new(api);
        office.store.apply(Action::SetSession(Some(session)));
        office
    }

    /// Read-only view of the shared snapshot.
    pub fn store(&self) -> &ClinicStore {
        &self.store
    }

    pub fn sign_in(&mut self, session: Session) {
        self.store.apply(Action::SetSession(Some(session)));
    }

    /// Drop the session and all fetched data.
    pub fn sign_out(&mut self) {
        self.store.apply(Action::Clear);
    }

    fn clinic_id(&self) -> Option<String> {
        self.store.session.as_ref().map(|s| s.clinic_id.clone())
    }

    fn notify(&mut self, message: &str, kind: NotificationKind) {
        self.store
            .apply(Action::PushNotification(Notification::now(message, kind)));
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    /// Fetch doctors, patients and appointments and replace the local
    /// collections with the authoritative response. Nothing is applied
    /// unless all three fetches succeed.
    pub fn refresh(&mut self) -> Result<RefreshOutcome, OfficeError> {
        let clinic_id = match self.clinic_id() {
            Some(id) => id,
            None => return Ok(RefreshOutcome::NotSignedIn),
        };
        debug!(clinic_id = clinic_id.as_str(), "refreshing collections");

        let doctors = self.api.list_doctors(&clinic_id)?;
        let patients = self.api.list_patients(&clinic_id)?;
        let appointments = self.api.list_appointments(&clinic_id)?;

        self.store.apply(Action::SetDoctors(doctors));
        self.store.apply(Action::SetPatients(patients));
        self.store.apply(Action::SetAppointments(appointments));
        Ok(RefreshOutcome::Loaded)
    }

    /// Fetch the clinic profile and settings.
    pub fn load_clinic(&mut self) -> Result<RefreshOutcome, OfficeError> {
        let clinic_id = match self.clinic_id() {
            Some(id) => id,
            None => return Ok(RefreshOutcome::NotSignedIn),
        };
        let clinic = self.api.get_clinic(&clinic_id)?;
        self.store.apply(Action::SetClinic(clinic));
        Ok(RefreshOutcome::Loaded)
    }

    // ------------------------------------------------------------------
    // Appointment lifecycle
    // ------------------------------------------------------------------

    /// Book an appointment (fresh, past-date rebook clone, or in-place
    /// rebook update, depending on the form).
    pub fn book(&mut self, form: &BookingForm) -> Result<Appointment, OfficeError> {
        self.validate_booking(form)?;

        // The conflict gate, against the current local snapshot, strictly
        // before the network call. A brand-new patient cannot conflict.
        if let PatientSelection::Existing(patient_id) = &form.patient {
            if schedule::has_conflict(
                &self.store.appointments,
                patient_id,
                &form.date,
                &form.time,
                form.rebooking_id.as_deref(),
            ) {
                warn!(patient_id = patient_id.as_str(), "booking aborted on conflict");
                return Err(OfficeError::Conflict(
                    "Conflict: This patient already has an appointment at this time.".into(),
                ));
            }
        }

        let clinic_id = self.clinic_id().unwrap_or_default();
        let (patient_id, new_patient_data) = match &form.patient {
            PatientSelection::Existing(id) => (id.clone(), None),
            PatientSelection::AddNew => (
                NEW_PATIENT_MARKER.to_string(),
                Some(NewPatientData {
                    name: form.new_patient.name.clone(),
                    phone: form.new_patient.phone.clone(),
                    age: form.new_patient.age.unwrap_or_default(),
                    gender: form.new_patient.gender.clone(),
                    address: form.new_patient.address.clone(),
                }),
            ),
            PatientSelection::Unset => {
                return Err(required(FILL_REQUIRED, vec![FormField::Patient]))
            }
        };

        let visit_type = if form.visit_type.is_empty() {
            "Consultation".to_string()
        } else {
            form.visit_type.clone()
        };

        if let Some(rebooking_id) = &form.rebooking_id {
            // Future cancelled slot: reuse the record in place.
            let patch = AppointmentPatch {
                clinic_id: Some(clinic_id),
                patient_id: Some(patient_id),
                doctor_id: Some(form.doctor_id.clone()),
                date: Some(form.date.clone()),
                time: Some(form.time.clone()),
                visit_type: Some(visit_type),
                status: Some(AppointmentStatus::Pending),
            };
            let updated = self.api.update_appointment(rebooking_id, &patch)?;
            self.store.apply(Action::ReplaceAppointment(updated.clone()));
            self.notify("Appointment Updated", NotificationKind::Success);
            info!(appointment_id = updated.id.as_str(), "appointment rebooked in place");
            Ok(updated)
        } else {
            let request = CreateAppointmentRequest {
                clinic_id,
                patient_id,
                doctor_id: form.doctor_id.clone(),
                date: form.date.clone(),
                time: form.time.clone(),
                visit_type,
                status: AppointmentStatus::Pending,
                new_patient_data,
            };
            let created = self.api.create_appointment(&request)?;
            if let Some(patient) = created.new_patient {
                self.store.apply(Action::PrependPatient(patient));
            }
            self.store
                .apply(Action::PrependAppointment(created.appointment.clone()));
            self.notify("Appointment Booked", NotificationKind::Success);
            info!(
                appointment_id = created.appointment.id.as_str(),
                "appointment booked"
            );
            Ok(created.appointment)
        }
    }

    fn validate_booking(&self, form: &BookingForm) -> Result<(), OfficeError> {
        let mut fields = Vec::new();
        if form.patient == PatientSelection::Unset {
            fields.push(FormField::Patient);
        }
        if form.patient == PatientSelection::AddNew {
            if form.new_patient.name.is_empty() {
                fields.push(FormField::NewPatientName);
            }
            if form.new_patient.phone.is_empty() {
                fields.push(FormField::NewPatientPhone);
            }
            if form.new_patient.age.is_none() {
                fields.push(FormField::NewPatientAge);
            }
            if form.new_patient.address.is_empty() {
                fields.push(FormField::NewPatientAddress);
            }
        }
        if form.doctor_id.is_empty() {
            fields.push(FormField::Doctor);
        }
        if form.date.is_empty() {
            fields.push(FormField::Date);
        }
        if form.time.is_empty() {
            fields.push(FormField::Time);
        }
        if !fields.is_empty() {
            return Err(required(FILL_REQUIRED, fields));
        }

        // Formats are validated, not trusted: lexicographic comparisons all
        // over the crate rely on the canonical shapes.
        let mut bad = Vec::new();
        if !timefmt::is_canonical_date(&form.date) {
            bad.push(FormField::Date);
        }
        if !timefmt::is_canonical_time(&form.time) {
            bad.push(FormField::Time);
        }
        if !bad.is_empty() {
            return Err(required("Invalid date or time format.", bad));
        }
        Ok(())
    }

    /// Prefill a rebook from a cancelled or no-show record.
    pub fn begin_rebook(&self, appointment_id: &str) -> Result<RebookPlan, OfficeError> {
        let source = self
            .store
            .appointment_by_id(appointment_id)
            .ok_or_else(|| OfficeError::Remote("Appointment not found".into()))?;
        let department = self
            .store
            .doctor_by_id(&source.doctor_id)
            .map(|d| d.department.clone())
            .unwrap_or_default();
        Ok(RebookPlan::from_source(
            source,
            &department,
            &timefmt::local_today(),
        ))
    }

    /// Cancel an appointment. Modeled as a negative-toned notification for
    /// visibility; the operation itself succeeding is the normal case.
    pub fn cancel(&mut self, appointment_id: &str) -> Result<Appointment, OfficeError> {
        let patch = AppointmentPatch::status(AppointmentStatus::Cancelled);
        let updated = self.api.update_appointment(appointment_id, &patch)?;
        self.store.apply(Action::ReplaceAppointment(updated.clone()));
        self.notify("Appointment Cancelled", NotificationKind::Error);
        info!(appointment_id, "appointment cancelled");
        Ok(updated)
    }

    /// Move an appointment to a new date/time and confirm it.
    pub fn reschedule(
        &mut self,
        appointment_id: &str,
        new_date: &str,
        new_time: &str,
    ) -> Result<Appointment, OfficeError> {
        if new_date.is_empty() || new_time.is_empty() {
            return Err(required(
                "Please select both a new date and time.",
                vec![FormField::Date, FormField::Time],
            ));
        }
        if !timefmt::is_canonical_date(new_date) || !timefmt::is_canonical_time(new_time) {
            return Err(required(
                "Invalid date or time format.",
                vec![FormField::Date, FormField::Time],
            ));
        }

        let current = self
            .store
            .appointment_by_id(appointment_id)
            .cloned()
            .ok_or_else(|| OfficeError::Remote("Appointment not found".into()))?;

        // Unchanged date and time: nothing to do, and no network call.
        if current.date == new_date && current.time == new_time {
            return Err(required(
                "The new date and time match the current booking.",
                vec![],
            ));
        }

        if schedule::has_conflict(
            &self.store.appointments,
            &current.patient_id,
            new_date,
            new_time,
            Some(appointment_id),
        ) {
            warn!(appointment_id, "reschedule aborted on conflict");
            return Err(OfficeError::Conflict(
                "This patient already has an appointment at this time!".into(),
            ));
        }

        let patch = AppointmentPatch {
            date: Some(new_date.to_string()),
            time: Some(new_time.to_string()),
            status: Some(AppointmentStatus::Confirmed),
            ..AppointmentPatch::default()
        };
        let updated = self.api.update_appointment(appointment_id, &patch)?;
        self.store.apply(Action::ReplaceAppointment(updated.clone()));
        self.notify("Rescheduled Successfully", NotificationKind::Success);
        info!(appointment_id, new_date, new_time, "appointment rescheduled");
        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Doctor administration
    // ------------------------------------------------------------------

    /// Create or update a doctor profile.
    pub fn save_doctor(&mut self, form: &DoctorForm) -> Result<crate::models::Doctor, OfficeError> {
        let mut fields = Vec::new();
        let checks: [(&str, FormField); 12] = [
            (form.name.as_str(), FormField::Name),
            (form.phone.as_str(), FormField::Phone),
            (form.email.as_str(), FormField::Email),
            (form.address.as_str(), FormField::Address),
            (form.department.as_str(), FormField::Department),
            (form.qualification.as_str(), FormField::Qualification),
            (form.experience.as_str(), FormField::Experience),
            (form.reg_no.as_str(), FormField::RegNo),
            (form.morning_start.as_str(), FormField::MorningStart),
            (form.morning_end.as_str(), FormField::MorningEnd),
            (form.evening_start.as_str(), FormField::EveningStart),
            (form.evening_end.as_str(), FormField::EveningEnd),
        ];
        for (value, field) in checks {
            if value.is_empty() {
                fields.push(field);
            }
        }
        if !fields.is_empty() {
            return Err(required(FILL_REQUIRED, fields));
        }

        let name = with_honorific(&form.name);
        let photo = if form.photo.is_empty() {
            form.name.chars().next().map(String::from).unwrap_or_default()
        } else {
            form.photo.clone()
        };

        let saved = match &form.id {
            Some(id) => {
                let patch = DoctorPatch {
                    name: Some(name),
                    phone: Some(form.phone.clone()),
                    email: Some(form.email.clone()),
                    gender: Some(form.gender.clone()),
                    address: Some(form.address.clone()),
                    department: Some(form.department.clone()),
                    qualification: Some(form.qualification.clone()),
                    experience: Some(form.experience.clone()),
                    reg_no: Some(form.reg_no.clone()),
                    morning_start: Some(form.morning_start.clone()),
                    morning_end: Some(form.morning_end.clone()),
                    evening_start: Some(form.evening_start.clone()),
                    evening_end: Some(form.evening_end.clone()),
                    status: Some(form.status.unwrap_or(DoctorStatus::Available)),
                    reason: None,
                    photo: Some(photo),
                };
                self.api.update_doctor(id, &patch)?
            }
            None => {
                let payload = DoctorPayload {
                    clinic_id: self.clinic_id().unwrap_or_default(),
                    name,
                    phone: form.phone.clone(),
                    email: form.email.clone(),
                    gender: form.gender.clone(),
                    address: form.address.clone(),
                    department: form.department.clone(),
                    qualification: form.qualification.clone(),
                    experience: form.experience.clone(),
                    reg_no: form.reg_no.clone(),
                    morning_start: form.morning_start.clone(),
                    morning_end: form.morning_end.clone(),
                    evening_start: form.evening_start.clone(),
                    evening_end: form.evening_end.clone(),
                    status: form.status.unwrap_or(DoctorStatus::Available),
                    photo,
                };
                self.api.create_doctor(&payload)?
            }
        };
        self.store.apply(Action::UpsertDoctor(saved.clone()));
        Ok(saved)
    }

    /// Deactivate a doctor. The reason is mandatory and recorded.
    pub fn deactivate_doctor(
        &mut self,
        doctor_id: &str,
        reason: &str,
    ) -> Result<crate::models::Doctor, OfficeError> {
        if reason.is_empty() {
            return Err(required(
                "Please select a reason to deactivate this doctor.",
                vec![FormField::Reason],
            ));
        }
        let patch = DoctorPatch {
            status: Some(DoctorStatus::Inactive),
            reason: Some(reason.to_string()),
            ..DoctorPatch::default()
        };
        let updated = self.api.update_doctor(doctor_id, &patch)?;
        self.store.apply(Action::UpsertDoctor(updated.clone()));
        Ok(updated)
    }

    /// Bring an inactive doctor back to Available.
    pub fn activate_doctor(&mut self, doctor_id: &str) -> Result<crate::models::Doctor, OfficeError> {
        let patch = DoctorPatch::status(DoctorStatus::Available);
        let updated = self.api.update_doctor(doctor_id, &patch)?;
        self.store.apply(Action::UpsertDoctor(updated.clone()));
        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Patient administration
    // ------------------------------------------------------------------

    /// Create or update a patient record. `type` and `last_visit` are never
    /// set by edits: new patients start as New with no visit, and existing
    /// values carry over.
    pub fn save_patient(&mut self, form: &PatientForm) -> Result<Patient, OfficeError> {
        let mut fields = Vec::new();
        if form.name.is_empty() {
            fields.push(FormField::Name);
        }
        if form.age.is_none() {
            fields.push(FormField::Age);
        }
        if form.phone.is_empty() {
            fields.push(FormField::Phone);
        }
        if form.address.is_empty() {
            fields.push(FormField::Address);
        }
        if !fields.is_empty() {
            return Err(required(FILL_REQUIRED, fields));
        }

        let (patient_type, last_visit) = match &form.id {
            Some(id) => self
                .store
                .patient_by_id(id)
                .map(|p| (p.patient_type, p.last_visit.clone()))
                .unwrap_or((PatientType::New, NO_VISIT.to_string())),
            None => (PatientType::New, NO_VISIT.to_string()),
        };

        let payload = PatientPayload {
            clinic_id: self.clinic_id().unwrap_or_default(),
            name: form.name.clone(),
            age: form.age.unwrap_or_default(),
            gender: form.gender.clone(),
            phone: form.phone.clone(),
            address: form.address.clone(),
            email: form.email.clone(),
            blood_group: form.blood_group.clone(),
            insurance_provider: form.insurance_provider.clone(),
            insurance_id: form.insurance_id.clone(),
            expiry_date: form.expiry_date.clone(),
            patient_type,
            last_visit,
        };

        let saved = match &form.id {
            Some(id) => {
                let updated = self.api.update_patient(id, &payload)?;
                self.store.apply(Action::ReplacePatient(updated.clone()));
                updated
            }
            None => {
                let created = self.api.create_patient(&payload)?;
                self.store.apply(Action::PrependPatient(created.clone()));
                created
            }
        };
        Ok(saved)
    }

    // ------------------------------------------------------------------
    // Clinic settings
    // ------------------------------------------------------------------

    /// Apply a partial settings update.
    pub fn update_clinic_settings(
        &mut self,
        patch: &ClinicPatch,
    ) -> Result<crate::models::ClinicProfile, OfficeError> {
        let clinic_id = self
            .clinic_id()
            .ok_or_else(|| OfficeError::Remote("Not signed in".into()))?;
        let updated = self.api.update_clinic(&clinic_id, patch)?;
        self.store.apply(Action::SetClinic(updated.clone()));
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appt(id: &str, date: &str, time: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: id.into(),
            clinic_id: None,
            patient_id: "p1".into(),
            doctor_id: "d1".into(),
            date: date.into(),
            time: time.into(),
            visit_type: "Checkup".into(),
            status,
        }
    }

    #[test]
    fn test_rebook_plan_branches_on_date() {
        let past = appt("a1", "2024-01-05", "09:00", AppointmentStatus::Confirmed);
        let plan = RebookPlan::from_source(&past, "Cardiology", "2024-01-10");
        assert_eq!(plan.mode, RebookMode::Clone);
        assert!(plan.form.rebooking_id.is_none());
        assert_eq!(plan.form.date, "2024-01-10");
        assert!(plan.form.time.is_empty());

        let future = appt("a2", "2024-01-12", "09:00", AppointmentStatus::Cancelled);
        let plan = RebookPlan::from_source(&future, "Cardiology", "2024-01-10");
        assert_eq!(plan.mode, RebookMode::ReuseRecord);
        assert_eq!(plan.form.rebooking_id.as_deref(), Some("a2"));
    }

    #[test]
    fn test_rebook_today_reuses_record() {
        // Today-or-later means reuse; only strictly-past dates clone.
        let today = appt("a3", "2024-01-10", "09:00", AppointmentStatus::Cancelled);
        let plan = RebookPlan::from_source(&today, "", "2024-01-10");
        assert_eq!(plan.mode, RebookMode::ReuseRecord);
    }
}
