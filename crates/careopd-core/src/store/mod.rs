//! The shared in-memory snapshot of the clinic's collections.
//!
//! Every view reads from one [`ClinicStore`]; every write goes through
//! [`ClinicStore::apply`] with an explicit [`Action`]. The store itself is
//! dumb on purpose: validation and conflict gating live in the lifecycle
//! manager, and a mutation is only ever applied from the success branch of
//! its own API call.

mod filters;

pub use filters::{AppointmentFilter, DoctorFilter, PatientFilter, StatusFilter};

use crate::ids;
use crate::models::{
    Appointment, AppointmentStatus, ClinicProfile, Doctor, DoctorStatus, Notification, Patient,
    PatientType, Session,
};
use crate::timefmt;

/// Explicit store mutations.
#[derive(Debug, Clone)]
pub enum Action {
    SetSession(Option<Session>),
    SetAppointments(Vec<Appointment>),
    SetDoctors(Vec<Doctor>),
    SetPatients(Vec<Patient>),
    SetClinic(ClinicProfile),
    /// New bookings go to the front so the freshest record renders first.
    PrependAppointment(Appointment),
    ReplaceAppointment(Appointment),
    PrependPatient(Patient),
    ReplacePatient(Patient),
    /// Replace by id, or append for a newly created doctor.
    UpsertDoctor(Doctor),
    PushNotification(Notification),
    /// Drop all session data on logout.
    Clear,
}

/// Appointment counters for the stat tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppointmentStats {
    pub total: usize,
    pub completed: usize,
    /// Open bookings: Pending or Confirmed.
    pub pending: usize,
    pub cancelled: usize,
}

/// Patient counters for the stat tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatientStats {
    pub total: usize,
    pub new: usize,
    pub returning: usize,
    /// Never visited or lapsed past the six-month horizon.
    pub no_visit: usize,
}

/// Doctor counters for the stat tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DoctorStats {
    pub total: usize,
    pub available: usize,
    pub on_leave: usize,
    pub inactive: usize,
}

/// The single shared data snapshot.
#[derive(Debug, Clone, Default)]
pub struct ClinicStore {
    pub session: Option<Session>,
    pub appointments: Vec<Appointment>,
    pub doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
    pub clinic: ClinicProfile,
    pub notifications: Vec<Notification>,
}

impl ClinicStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one mutation.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetSession(session) => self.session = session,
            Action::SetAppointments(appointments) => self.appointments = appointments,
            Action::SetDoctors(doctors) => self.doctors = doctors,
            Action::SetPatients(patients) => self.patients = patients,
            Action::SetClinic(clinic) => self.clinic = clinic,
            Action::PrependAppointment(appointment) => {
                self.appointments.insert(0, appointment);
            }
            Action::ReplaceAppointment(appointment) => {
                if let Some(slot) = self
                    .appointments
                    .iter_mut()
                    .find(|a| ids::same(&a.id, &appointment.id))
                {
                    *slot = appointment;
                }
            }
            Action::PrependPatient(patient) => self.patients.insert(0, patient),
            Action::ReplacePatient(patient) => {
                if let Some(slot) = self
                    .patients
                    .iter_mut()
                    .find(|p| ids::same(&p.id, &patient.id))
                {
                    *slot = patient;
                }
            }
            Action::UpsertDoctor(doctor) => {
                match self
                    .doctors
                    .iter_mut()
                    .find(|d| ids::same(&d.id, &doctor.id))
                {
                    Some(slot) => *slot = doctor,
                    None => self.doctors.push(doctor),
                }
            }
            Action::PushNotification(notification) => {
                self.notifications.insert(0, notification);
            }
            Action::Clear => {
                self.session = None;
                self.appointments.clear();
                self.doctors.clear();
                self.patients.clear();
                self.clinic = ClinicProfile::default();
                self.notifications.clear();
            }
        }
    }

    // ------------------------------------------------------------------
    // Selectors
    // ------------------------------------------------------------------

    pub fn doctor_by_id(&self, id: &str) -> Option<&Doctor> {
        self.doctors.iter().find(|d| ids::same(&d.id, id))
    }

    pub fn patient_by_id(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| ids::same(&p.id, id))
    }

    pub fn appointment_by_id(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| ids::same(&a.id, id))
    }

    /// Patient display name with a lookup-miss fallback.
    pub fn patient_name(&self, id: &str) -> String {
        self.patient_by_id(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "Unknown Patient".to_string())
    }

    /// Doctor display name with a lookup-miss fallback.
    pub fn doctor_name(&self, id: &str) -> String {
        self.doctor_by_id(id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| "Unknown Doctor".to_string())
    }

    /// Distinct departments, in first-seen order.
    pub fn departments(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for d in &self.doctors {
            if !out.contains(&d.department) {
                out.push(d.department.clone());
            }
        }
        out
    }

    pub fn appointment_stats(&self) -> AppointmentStats {
        let mut stats = AppointmentStats {
            total: self.appointments.len(),
            ..AppointmentStats::default()
        };
        for a in &self.appointments {
            match a.status {
                AppointmentStatus::Completed => stats.completed += 1,
                AppointmentStatus::Cancelled => stats.cancelled += 1,
                AppointmentStatus::Pending | AppointmentStatus::Confirmed => stats.pending += 1,
            }
        }
        stats
    }

    pub fn patient_stats(&self, today: &str) -> PatientStats {
        let six_months_ago = timefmt::six_months_before(today).unwrap_or_default();
        let mut stats = PatientStats {
            total: self.patients.len(),
            ..PatientStats::default()
        };
        for p in &self.patients {
            match p.patient_type {
                PatientType::New => stats.new += 1,
                PatientType::Returning => stats.returning += 1,
            }
            if !p.has_visited() || p.last_visit.as_str() < six_months_ago.as_str() {
                stats.no_visit += 1;
            }
        }
        stats
    }

    pub fn doctor_stats(&self) -> DoctorStats {
        let mut stats = DoctorStats {
            total: self.doctors.len(),
            ..DoctorStats::default()
        };
        for d in &self.doctors {
            match d.status {
                DoctorStatus::Available => stats.available += 1,
                DoctorStatus::OnLeave => stats.on_leave += 1,
                DoctorStatus::Inactive => stats.inactive += 1,
            }
        }
        stats
    }
}
