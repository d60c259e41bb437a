//! CareOPD Core Library
//!
//! Domain core for a clinic front-office: scheduling, conflict gating,
//! appointment lifecycle and roster views. Authoritative state lives behind
//! a remote CRUD API; this crate holds the session's local snapshot and all
//! of the logic around it.
//!
//! # Architecture
//!
//! ```text
//!                 remote clinic API (opaque collaborator)
//!                       │                    ▲
//!                 fetch │                    │ create / update
//!                       ▼                    │
//!               ┌───────────────────────────────────┐
//!               │         FrontOffice (office)      │
//!               │  validate → conflict gate → call  │
//!               │  → reconcile from response body   │
//!               └───────────────┬───────────────────┘
//!                               │ Action
//!                               ▼
//!                       ClinicStore (store)
//!                   appointments · doctors · patients
//!                               │ selectors
//!                               ▼
//!             slot grids · sections · stats · filtered lists
//! ```
//!
//! # Core Principle
//!
//! **A write only ever lands in the store from the success branch of its own
//! API call.** The conflict gate runs synchronously against the local
//! snapshot immediately before the call; a failed call leaves the snapshot
//! untouched.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Doctor, Patient, Appointment, etc.)
//! - [`api`]: The remote CRUD contract, error taxonomy and in-memory test
//!   implementation
//! - [`store`]: The shared snapshot, explicit actions and pure selectors
//! - [`schedule`]: Slot grid, shift filtering, conflict detection, section
//!   classification
//! - [`office`]: The appointment lifecycle manager
//! - [`ids`] / [`timefmt`]: Canonical identifier and date/time handling

pub mod api;
pub mod ids;
pub mod models;
pub mod office;
pub mod schedule;
pub mod store;
pub mod timefmt;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, ApiResult};
pub use models::{
    Appointment, AppointmentStatus, ClinicProfile, Doctor, DoctorStatus, Notification,
    NotificationKind, Patient, PatientType, Session,
};
pub use office::{
    BookingForm, FormField, FrontOffice, OfficeError, PatientSelection, RebookMode, RebookPlan,
    RefreshOutcome,
};
pub use schedule::{
    booked_slots, classify_appointments, classify_patients, has_conflict, time_grid,
    AppointmentSections, PatientSections, ShiftWindows,
};
pub use store::{Action, ClinicStore};
