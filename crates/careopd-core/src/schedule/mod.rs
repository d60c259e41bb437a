//! Scheduling: the slot grid, shift filtering, conflict detection and
//! temporal section classification.

pub mod conflict;
pub mod grid;
pub mod sections;
pub mod shifts;

pub use conflict::{booked_slots, day_schedule, has_conflict, DaySlot, SlotStatus};
pub use grid::{time_grid, SLOT_INTERVAL_MINUTES};
pub use sections::{
    classify_appointments, classify_patients, AppointmentSections, ClassifiedPatient,
    PatientBucket, PatientSections,
};
pub use shifts::{ShiftWindows, DEFAULT_EVENING, DEFAULT_MORNING};
