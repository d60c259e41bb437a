//! Domain models shared across the crate.

mod appointment;
mod clinic;
mod doctor;
mod notification;
mod patient;

pub use appointment::{Appointment, AppointmentStatus};
pub use clinic::{ClinicProfile, MessageTemplate, Session};
pub use doctor::{with_honorific, Doctor, DoctorStatus};
pub use notification::{Notification, NotificationKind};
pub use patient::{Patient, PatientType, NO_VISIT};
