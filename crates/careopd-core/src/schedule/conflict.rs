//! Booking conflict detection.
//!
//! The authoritative invariant is per patient: at most one non-cancelled
//! appointment per (patient, date, time). The doctor-scoped views here exist
//! for rendering only; two patients *may* hold the same doctor slot, and
//! that permissiveness is intentional pending product clarification.

use tracing::debug;

use crate::ids;
use crate::models::{Appointment, AppointmentStatus, Doctor};
use crate::schedule::ShiftWindows;

/// True iff an existing non-cancelled appointment occupies (patient, date,
/// time), ignoring the record identified by `exclude_id` (used when editing
/// that record in place).
///
/// This is the single gate evaluated synchronously against the local
/// snapshot immediately before every create/update request; a hit aborts the
/// operation before anything goes on the wire.
pub fn has_conflict(
    appointments: &[Appointment],
    patient_id: &str,
    date: &str,
    time: &str,
    exclude_id: Option<&str>,
) -> bool {
    let hit = appointments.iter().any(|a| {
        ids::same(&a.patient_id, patient_id)
            && a.date == date
            && a.time == time
            && a.status != AppointmentStatus::Cancelled
            && exclude_id.map_or(true, |ex| !ids::same(&a.id, ex))
    });
    if hit {
        debug!(patient_id, date, time, "patient slot conflict");
    }
    hit
}

/// Times already taken for a doctor on a date (non-cancelled only). Used to
/// disable slots in the picker; not part of the conflict gate.
pub fn booked_slots(appointments: &[Appointment], doctor_id: &str, date: &str) -> Vec<String> {
    appointments
        .iter()
        .filter(|a| {
            ids::same(&a.doctor_id, doctor_id)
                && a.date == date
                && a.status != AppointmentStatus::Cancelled
        })
        .map(|a| a.time.clone())
        .collect()
}

/// Occupancy of a single slot in a doctor's day view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
    Booked,
    Completed,
}

/// One slot of a doctor's day schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySlot {
    pub time: String,
    pub status: SlotStatus,
}

/// A doctor's full day: their shift-filtered grid with per-slot occupancy.
pub fn day_schedule(
    appointments: &[Appointment],
    doctor: &Doctor,
    date: &str,
    grid: &[String],
) -> Vec<DaySlot> {
    let windows = ShiftWindows::for_doctor(doctor);
    let day: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| {
            ids::same(&a.doctor_id, &doctor.id)
                && a.date == date
                && a.status != AppointmentStatus::Cancelled
        })
        .collect();

    windows
        .filter_slots(grid)
        .into_iter()
        .map(|time| {
            let status = match day.iter().find(|a| a.time == time) {
                Some(a) if a.status == AppointmentStatus::Completed => SlotStatus::Completed,
                Some(_) => SlotStatus::Booked,
                None => SlotStatus::Available,
            };
            DaySlot { time, status }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn appt(id: &str, patient: &str, doctor: &str, date: &str, time: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: id.into(),
            clinic_id: None,
            patient_id: patient.into(),
            doctor_id: doctor.into(),
            date: date.into(),
            time: time.into(),
            visit_type: "Consultation".into(),
            status,
        }
    }

    #[test]
    fn test_conflict_positive() {
        let appts = vec![appt("a1", "P1", "d1", "2024-01-10", "09:00", AppointmentStatus::Confirmed)];
        assert!(has_conflict(&appts, "P1", "2024-01-10", "09:00", None));
    }

    #[test]
    fn test_cancelled_records_never_conflict() {
        let appts = vec![appt("a1", "P1", "d1", "2024-01-10", "09:00", AppointmentStatus::Cancelled)];
        assert!(!has_conflict(&appts, "P1", "2024-01-10", "09:00", None));
    }

    #[test]
    fn test_exclusion_skips_the_edited_record() {
        let appts = vec![appt("a1", "P1", "d1", "2024-01-10", "09:00", AppointmentStatus::Confirmed)];
        assert!(!has_conflict(&appts, "P1", "2024-01-10", "09:00", Some("a1")));
        assert!(has_conflict(&appts, "P1", "2024-01-10", "09:00", Some("a2")));
    }

    #[test]
    fn test_mixed_id_representations_still_match() {
        let appts = vec![appt("a1", "201", "d1", "2024-01-10", "09:00", AppointmentStatus::Pending)];
        assert!(has_conflict(&appts, " 201", "2024-01-10", "09:00", None));
    }

    #[test]
    fn test_same_doctor_slot_two_patients_is_not_a_conflict() {
        // Deliberate permissiveness: the uniqueness invariant is per patient.
        let appts = vec![appt("a1", "P1", "d1", "2024-01-10", "09:00", AppointmentStatus::Confirmed)];
        assert!(!has_conflict(&appts, "P2", "2024-01-10", "09:00", None));
        assert_eq!(booked_slots(&appts, "d1", "2024-01-10"), vec!["09:00"]);
    }

    #[test]
    fn test_booked_slots_skips_cancelled_and_other_days() {
        let appts = vec![
            appt("a1", "P1", "d1", "2024-01-10", "09:00", AppointmentStatus::Confirmed),
            appt("a2", "P2", "d1", "2024-01-10", "09:30", AppointmentStatus::Cancelled),
            appt("a3", "P3", "d1", "2024-01-11", "10:00", AppointmentStatus::Pending),
            appt("a4", "P4", "d2", "2024-01-10", "10:30", AppointmentStatus::Pending),
        ];
        assert_eq!(booked_slots(&appts, "d1", "2024-01-10"), vec!["09:00"]);
    }
}
