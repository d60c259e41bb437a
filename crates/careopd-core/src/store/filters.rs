//! Client-side list filtering.
//!
//! Pure selectors over the store's collections. Matching mirrors the list
//! screens: case-insensitive substring search, inclusive date ranges on
//! canonical date strings, and status tiles that double as filters.

use crate::ids;
use crate::models::{Appointment, AppointmentStatus, Doctor, DoctorStatus, Patient, PatientType};
use crate::timefmt;

use super::ClinicStore;

/// Status tile selection for the appointment list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    /// Open bookings (Pending or Confirmed).
    Upcoming,
    Completed,
    Cancelled,
}

/// Filter state for the appointment list.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub status: StatusFilter,
    /// Matched against patient and doctor names.
    pub query: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub doctor_id: Option<String>,
}

/// Filter state for the patient roster.
#[derive(Debug, Clone, Default)]
pub struct PatientFilter {
    /// Matched against name and phone.
    pub query: String,
    pub patient_type: Option<PatientType>,
    /// Restrict to patients with no visit inside the six-month horizon.
    pub no_visit_only: bool,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Filter state for the doctor roster.
#[derive(Debug, Clone, Default)]
pub struct DoctorFilter {
    /// Matched against name and department.
    pub query: String,
    pub status: Option<DoctorStatus>,
    pub department: Option<String>,
}

impl ClinicStore {
    /// Appointments matching the filter, in store order.
    pub fn filtered_appointments(&self, filter: &AppointmentFilter) -> Vec<Appointment> {
        self.appointments
            .iter()
            .filter(|a| self.appointment_matches(a, filter))
            .cloned()
            .collect()
    }

    fn appointment_matches(&self, a: &Appointment, filter: &AppointmentFilter) -> bool {
        let status_ok = match filter.status {
            StatusFilter::All => true,
            StatusFilter::Upcoming => a.status.is_open(),
            StatusFilter::Completed => a.status == AppointmentStatus::Completed,
            StatusFilter::Cancelled => a.status == AppointmentStatus::Cancelled,
        };
        if !status_ok {
            return false;
        }

        if !filter.query.is_empty() {
            let q = filter.query.to_lowercase();
            let patient = self.patient_name(&a.patient_id).to_lowercase();
            let doctor = self.doctor_name(&a.doctor_id).to_lowercase();
            if !patient.contains(&q) && !doctor.contains(&q) {
                return false;
            }
        }

        if let Some(from) = &filter.from {
            if a.date.as_str() < from.as_str() {
                return false;
            }
        }
        if let Some(to) = &filter.to {
            if a.date.as_str() > to.as_str() {
                return false;
            }
        }
        if let Some(doctor_id) = &filter.doctor_id {
            if !ids::same(&a.doctor_id, doctor_id) {
                return false;
            }
        }
        true
    }

    /// Patients matching the filter, in store order.
    pub fn filtered_patients(&self, filter: &PatientFilter, today: &str) -> Vec<Patient> {
        let six_months_ago = timefmt::six_months_before(today).unwrap_or_default();
        self.patients
            .iter()
            .filter(|p| {
                if !filter.query.is_empty() {
                    let q = filter.query.to_lowercase();
                    if !p.name.to_lowercase().contains(&q) && !p.phone.contains(&filter.query) {
                        return false;
                    }
                }
                if let Some(kind) = filter.patient_type {
                    if p.patient_type != kind {
                        return false;
                    }
                }
                if filter.no_visit_only
                    && p.has_visited()
                    && p.last_visit.as_str() >= six_months_ago.as_str()
                {
                    return false;
                }
                if filter.from.is_some() || filter.to.is_some() {
                    if !p.has_visited() {
                        return false;
                    }
                    if let Some(from) = &filter.from {
                        if p.last_visit.as_str() < from.as_str() {
                            return false;
                        }
                    }
                    if let Some(to) = &filter.to {
                        if p.last_visit.as_str() > to.as_str() {
                            return false;
                        }
                    }
                }
                true
            })
            .cloned()
            .collect()
    }

    /// Doctors matching the filter, sorted by department.
    pub fn filtered_doctors(&self, filter: &DoctorFilter) -> Vec<Doctor> {
        let mut out: Vec<Doctor> = self
            .doctors
            .iter()
            .filter(|d| {
                if !filter.query.is_empty() {
                    let q = filter.query.to_lowercase();
                    if !d.name.to_lowercase().contains(&q)
                        && !d.department.to_lowercase().contains(&q)
                    {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if d.status != status {
                        return false;
                    }
                }
                if let Some(dept) = &filter.department {
                    if &d.department != dept {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        out.sort_by(|a, b| a.department.cmp(&b.department));
        out
    }
}
