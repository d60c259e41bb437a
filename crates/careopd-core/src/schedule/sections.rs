//! Temporal section classification for display.
//!
//! Both classifiers recompute from scratch against the reference "today" on
//! every call; nothing is maintained incrementally.

use crate::ids;
use crate::models::{Appointment, AppointmentStatus, Patient};
use crate::timefmt;

/// Sentinel sort date for patients who have never visited, so they order
/// after every real visit date.
const NEVER_VISITED_SORT_DATE: &str = "0000-00-00";

/// Appointments partitioned by date relative to today.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppointmentSections {
    /// date < today, newest first (descending by date then time).
    pub previous: Vec<Appointment>,
    /// date == today, ascending by time.
    pub today: Vec<Appointment>,
    /// date > today, ascending by date then time.
    pub upcoming: Vec<Appointment>,
}

/// Partition appointments into previous/today/upcoming sections.
pub fn classify_appointments(appointments: &[Appointment], today: &str) -> AppointmentSections {
    let mut sections = AppointmentSections::default();
    for a in appointments {
        if a.date.as_str() < today {
            sections.previous.push(a.clone());
        } else if a.date == today {
            sections.today.push(a.clone());
        } else {
            sections.upcoming.push(a.clone());
        }
    }
    sections
        .previous
        .sort_by(|a, b| (b.date.as_str(), b.time.as_str()).cmp(&(a.date.as_str(), a.time.as_str())));
    sections.today.sort_by(|a, b| a.time.cmp(&b.time));
    sections
        .upcoming
        .sort_by(|a, b| (a.date.as_str(), a.time.as_str()).cmp(&(b.date.as_str(), b.time.as_str())));
    sections
}

/// Display bucket for a patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientBucket {
    /// Has a non-cancelled appointment today.
    VisitingToday,
    /// Last visit within the past six months.
    Recent,
    /// Never visited, or last visit older than six months.
    NoVisit,
}

/// A patient with its computed bucket and synthetic sort keys.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedPatient {
    pub patient: Patient,
    pub bucket: PatientBucket,
    /// Today's appointment date, the last visit date, or the never-visited
    /// sentinel.
    pub sort_date: String,
    /// Today's appointment time, when visiting today.
    pub sort_time: String,
}

/// Patients partitioned for the roster view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientSections {
    /// Ascending by today's appointment time.
    pub visiting_today: Vec<ClassifiedPatient>,
    /// Most recent visit first.
    pub recent: Vec<ClassifiedPatient>,
    /// Most recent lapsed visit first; never-visited patients last.
    pub no_visit: Vec<ClassifiedPatient>,
}

/// Classify patients against today's appointments and the six-month horizon.
pub fn classify_patients(
    patients: &[Patient],
    appointments: &[Appointment],
    today: &str,
) -> PatientSections {
    let six_months_ago = timefmt::six_months_before(today).unwrap_or_default();
    let mut sections = PatientSections::default();

    for p in patients {
        let today_appt = appointments.iter().find(|a| {
            ids::same(&a.patient_id, &p.id)
                && a.date == today
                && a.status != AppointmentStatus::Cancelled
        });

        let classified = if let Some(appt) = today_appt {
            ClassifiedPatient {
                patient: p.clone(),
                bucket: PatientBucket::VisitingToday,
                sort_date: appt.date.clone(),
                sort_time: appt.time.clone(),
            }
        } else if !p.has_visited() || p.last_visit.as_str() < six_months_ago.as_str() {
            ClassifiedPatient {
                patient: p.clone(),
                bucket: PatientBucket::NoVisit,
                sort_date: if p.has_visited() {
                    p.last_visit.clone()
                } else {
                    NEVER_VISITED_SORT_DATE.to_string()
                },
                sort_time: String::new(),
            }
        } else {
            ClassifiedPatient {
                patient: p.clone(),
                bucket: PatientBucket::Recent,
                sort_date: p.last_visit.clone(),
                sort_time: String::new(),
            }
        };

        match classified.bucket {
            PatientBucket::VisitingToday => sections.visiting_today.push(classified),
            PatientBucket::Recent => sections.recent.push(classified),
            PatientBucket::NoVisit => sections.no_visit.push(classified),
        }
    }

    sections
        .visiting_today
        .sort_by(|a, b| a.sort_time.cmp(&b.sort_time));
    sections.recent.sort_by(|a, b| b.sort_date.cmp(&a.sort_date));
    sections.no_visit.sort_by(|a, b| b.sort_date.cmp(&a.sort_date));
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientType;

    fn appt(id: &str, patient: &str, date: &str, time: &str, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: id.into(),
            clinic_id: None,
            patient_id: patient.into(),
            doctor_id: "d1".into(),
            date: date.into(),
            time: time.into(),
            visit_type: "Checkup".into(),
            status,
        }
    }

    fn patient(id: &str, last_visit: &str) -> Patient {
        Patient {
            id: id.into(),
            clinic_id: None,
            name: format!("Patient {}", id),
            age: 30,
            gender: "F".into(),
            phone: String::new(),
            address: String::new(),
            email: String::new(),
            blood_group: String::new(),
            insurance_provider: String::new(),
            insurance_id: String::new(),
            expiry_date: String::new(),
            patient_type: PatientType::Returning,
            last_visit: last_visit.into(),
        }
    }

    const TODAY: &str = "2024-06-15";

    #[test]
    fn test_appointment_partition_and_order() {
        let appts = vec![
            appt("a1", "p1", "2024-06-14", "14:00", AppointmentStatus::Completed),
            appt("a2", "p2", "2024-06-15", "10:30", AppointmentStatus::Pending),
            appt("a3", "p3", "2024-06-15", "09:00", AppointmentStatus::Confirmed),
            appt("a4", "p4", "2024-06-16", "11:00", AppointmentStatus::Pending),
            appt("a5", "p5", "2024-06-14", "16:00", AppointmentStatus::Cancelled),
        ];
        let sections = classify_appointments(&appts, TODAY);

        assert_eq!(sections.previous.len(), 2);
        assert_eq!(sections.today.len(), 2);
        assert_eq!(sections.upcoming.len(), 1);

        // previous: descending by date+time
        assert_eq!(sections.previous[0].id, "a5");
        assert_eq!(sections.previous[1].id, "a1");
        // today: ascending by time
        assert_eq!(sections.today[0].id, "a3");
        assert_eq!(sections.today[1].id, "a2");
    }

    #[test]
    fn test_patient_buckets() {
        let appts = vec![appt("a1", "p1", TODAY, "09:30", AppointmentStatus::Pending)];
        let patients = vec![
            patient("p1", "2024-06-01"),
            patient("p2", "2024-05-01"),
            patient("p3", "2023-01-01"),
            patient("p4", "-"),
        ];
        let sections = classify_patients(&patients, &appts, TODAY);

        assert_eq!(sections.visiting_today.len(), 1);
        assert_eq!(sections.visiting_today[0].patient.id, "p1");
        assert_eq!(sections.visiting_today[0].sort_time, "09:30");

        assert_eq!(sections.recent.len(), 1);
        assert_eq!(sections.recent[0].patient.id, "p2");

        let no_visit_ids: Vec<&str> = sections
            .no_visit
            .iter()
            .map(|c| c.patient.id.as_str())
            .collect();
        assert_eq!(no_visit_ids, vec!["p3", "p4"]);
        assert_eq!(sections.no_visit[1].sort_date, "0000-00-00");
    }

    #[test]
    fn test_cancelled_today_appointment_does_not_count_as_visiting() {
        let appts = vec![appt("a1", "p1", TODAY, "09:30", AppointmentStatus::Cancelled)];
        let patients = vec![patient("p1", "2024-06-01")];
        let sections = classify_patients(&patients, &appts, TODAY);
        assert!(sections.visiting_today.is_empty());
        assert_eq!(sections.recent.len(), 1);
    }
}
