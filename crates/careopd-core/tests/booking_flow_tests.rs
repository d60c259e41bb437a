//! End-to-end lifecycle tests against the in-memory backend.
//!
//! These drive the full path: validation → conflict gate → API call →
//! store reconciliation → notification feed.

use anyhow::Result;
use chrono::{Duration, Local};

use careopd_core::api::memory::InMemoryApi;
use careopd_core::api::ApiError;
use careopd_core::models::{
    Appointment, AppointmentStatus, Doctor, DoctorStatus, NotificationKind, Patient, PatientType,
    Session, NO_VISIT,
};
use careopd_core::office::{
    BookingForm, FormField, FrontOffice, NewPatientDraft, OfficeError, PatientForm,
    PatientSelection, RebookMode, RefreshOutcome,
};
use careopd_core::schedule::classify_appointments;

fn rel_date(days: i64) -> String {
    (Local::now() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

fn doctor(id: &str) -> Doctor {
    Doctor {
        id: id.into(),
        clinic_id: Some("c1".into()),
        name: "Dr. Sarah Smith".into(),
        department: "Cardiology".into(),
        status: DoctorStatus::Available,
        phone: "555-0101".into(),
        email: "sarah@careopd.test".into(),
        gender: "F".into(),
        address: "123 Health Ave".into(),
        qualification: "MBBS".into(),
        experience: "12".into(),
        reg_no: "REG-101".into(),
        morning_start: Some("09:00".into()),
        morning_end: Some("13:00".into()),
        evening_start: Some("17:00".into()),
        evening_end: Some("21:00".into()),
        reason: None,
        photo: "S".into(),
    }
}

fn patient(id: &str, name: &str) -> Patient {
    Patient {
        id: id.into(),
        clinic_id: Some("c1".into()),
        name: name.into(),
        age: 34,
        gender: "M".into(),
        phone: "555-1111".into(),
        address: "123 Main St".into(),
        email: String::new(),
        blood_group: String::new(),
        insurance_provider: String::new(),
        insurance_id: String::new(),
        expiry_date: String::new(),
        patient_type: PatientType::Returning,
        last_visit: NO_VISIT.into(),
    }
}

fn appointment(id: &str, patient_id: &str, date: &str, time: &str, status: AppointmentStatus) -> Appointment {
    Appointment {
        id: id.into(),
        clinic_id: Some("c1".into()),
        patient_id: patient_id.into(),
        doctor_id: "d1".into(),
        date: date.into(),
        time: time.into(),
        visit_type: "Consultation".into(),
        status,
    }
}

fn session() -> Session {
    Session {
        clinic_id: "c1".into(),
        user_name: "front-desk".into(),
    }
}

fn seeded_api() -> InMemoryApi {
    let api = InMemoryApi::new();
    api.seed_doctor(doctor("d1"));
    api.seed_patient(patient("p1", "John Doe"));
    api.seed_patient(patient("p2", "Jane Roe"));
    api
}

fn booking(patient_id: &str, date: &str, time: &str) -> BookingForm {
    BookingForm {
        patient: PatientSelection::Existing(patient_id.into()),
        department: "Cardiology".into(),
        doctor_id: "d1".into(),
        date: date.into(),
        time: time.into(),
        ..BookingForm::default()
    }
}

#[test]
fn refresh_short_circuits_without_a_session() -> Result<()> {
    let api = seeded_api();
    let mut office = FrontOffice::new(&api);

    assert_eq!(office.refresh()?, RefreshOutcome::NotSignedIn);
    assert!(office.store().doctors.is_empty());
    Ok(())
}

#[test]
fn refresh_replaces_collections_from_the_server() -> Result<()> {
    let api = seeded_api();
    api.seed_appointment(appointment("a1", "p1", &rel_date(1), "09:00", AppointmentStatus::Pending));

    let mut office = FrontOffice::with_session(&api, session());
    assert_eq!(office.refresh()?, RefreshOutcome::Loaded);
    assert_eq!(office.store().doctors.len(), 1);
    assert_eq!(office.store().patients.len(), 2);
    assert_eq!(office.store().appointments.len(), 1);
    Ok(())
}

#[test]
fn book_prepends_and_notifies() -> Result<()> {
    let api = seeded_api();
    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    let booked = office.book(&booking("p1", &rel_date(1), "09:00"))?;
    assert_eq!(booked.status, AppointmentStatus::Pending);
    assert_eq!(office.store().appointments[0].id, booked.id);

    let note = &office.store().notifications[0];
    assert_eq!(note.message, "Appointment Booked");
    assert_eq!(note.kind, NotificationKind::Success);
    Ok(())
}

#[test]
fn book_flags_every_missing_field() {
    let api = seeded_api();
    let mut office = FrontOffice::with_session(&api, session());

    let err = office.book(&BookingForm::default()).unwrap_err();
    match err {
        OfficeError::Validation { message, fields } => {
            assert_eq!(message, "Please fill all required details marked with *");
            assert!(fields.contains(&FormField::Patient));
            assert!(fields.contains(&FormField::Doctor));
            assert!(fields.contains(&FormField::Date));
            assert!(fields.contains(&FormField::Time));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    // Nothing reached the backend.
    assert_eq!(api.write_calls(), 0);
}

#[test]
fn book_flags_incomplete_new_patient_subform() {
    let api = seeded_api();
    let mut office = FrontOffice::with_session(&api, session());

    let mut form = booking("p1", &rel_date(1), "09:00");
    form.patient = PatientSelection::AddNew;
    form.new_patient = NewPatientDraft {
        name: "Alice Smith".into(),
        ..NewPatientDraft::default()
    };

    let err = office.book(&form).unwrap_err();
    match err {
        OfficeError::Validation { fields, .. } => {
            assert!(!fields.contains(&FormField::NewPatientName));
            assert!(fields.contains(&FormField::NewPatientPhone));
            assert!(fields.contains(&FormField::NewPatientAge));
            assert!(fields.contains(&FormField::NewPatientAddress));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn book_with_inline_new_patient_adds_both_records() -> Result<()> {
    let api = seeded_api();
    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    let mut form = booking("ignored", &rel_date(1), "09:30");
    form.patient = PatientSelection::AddNew;
    form.new_patient = NewPatientDraft {
        name: "Alice Smith".into(),
        phone: "555-4444".into(),
        age: Some(30),
        gender: "F".into(),
        address: "101 Elm St".into(),
    };

    let booked = office.book(&form)?;
    let store = office.store();
    assert_eq!(store.patients[0].name, "Alice Smith");
    assert_eq!(store.patients[0].patient_type, PatientType::New);
    assert_eq!(store.patients[0].last_visit, NO_VISIT);
    assert_eq!(booked.patient_id, store.patients[0].id);
    Ok(())
}

#[test]
fn conflict_aborts_before_any_network_call() -> Result<()> {
    let api = seeded_api();
    api.seed_appointment(appointment("a1", "p1", &rel_date(1), "09:00", AppointmentStatus::Confirmed));

    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    let err = office.book(&booking("p1", &rel_date(1), "09:00")).unwrap_err();
    assert!(matches!(err, OfficeError::Conflict(_)));
    assert_eq!(api.write_calls(), 0);

    // Another patient at the same doctor slot is allowed by design.
    office.book(&booking("p2", &rel_date(1), "09:00"))?;
    Ok(())
}

#[test]
fn cancelled_record_does_not_block_the_slot() -> Result<()> {
    let api = seeded_api();
    api.seed_appointment(appointment("a1", "p1", &rel_date(1), "09:00", AppointmentStatus::Cancelled));

    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;
    office.book(&booking("p1", &rel_date(1), "09:00"))?;
    Ok(())
}

#[test]
fn server_rejection_is_surfaced_verbatim_and_store_is_untouched() -> Result<()> {
    let api = seeded_api();
    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;
    let before = office.store().appointments.clone();

    api.fail_next(ApiError::Rejection {
        message: Some("Slot no longer available".into()),
    });
    let err = office.book(&booking("p1", &rel_date(1), "10:00")).unwrap_err();
    assert_eq!(err, OfficeError::Remote("Slot no longer available".into()));
    assert_eq!(office.store().appointments, before);
    assert!(office.store().notifications.is_empty());
    Ok(())
}

#[test]
fn transport_failure_degrades_to_a_generic_message() -> Result<()> {
    let api = seeded_api();
    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    api.fail_next(ApiError::Transport {
        detail: "connection refused".into(),
    });
    let err = office.book(&booking("p1", &rel_date(1), "10:00")).unwrap_err();
    assert_eq!(
        err,
        OfficeError::Connection("Server error: Could not connect to backend.".into())
    );
    Ok(())
}

#[test]
fn cancel_reconciles_from_the_response_body() -> Result<()> {
    let api = seeded_api();
    api.seed_appointment(appointment("a1", "p1", &rel_date(1), "09:00", AppointmentStatus::Confirmed));

    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    let cancelled = office.cancel("a1")?;
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert_eq!(
        office.store().appointment_by_id("a1").unwrap().status,
        AppointmentStatus::Cancelled
    );

    let note = &office.store().notifications[0];
    assert_eq!(note.message, "Appointment Cancelled");
    assert_eq!(note.kind, NotificationKind::Error);
    Ok(())
}

#[test]
fn reschedule_with_unchanged_slot_issues_no_network_call() -> Result<()> {
    let api = seeded_api();
    let date = rel_date(1);
    api.seed_appointment(appointment("a1", "p1", &date, "09:00", AppointmentStatus::Confirmed));

    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    let calls_before = api.write_calls();
    let err = office.reschedule("a1", &date, "09:00").unwrap_err();
    assert!(matches!(err, OfficeError::Validation { .. }));
    assert_eq!(api.write_calls(), calls_before);
    Ok(())
}

#[test]
fn reschedule_detects_conflicts_excluding_its_own_record() -> Result<()> {
    let api = seeded_api();
    let date = rel_date(1);
    api.seed_appointment(appointment("a1", "p1", &date, "09:00", AppointmentStatus::Confirmed));
    api.seed_appointment(appointment("a2", "p1", &date, "10:00", AppointmentStatus::Confirmed));

    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    // Moving a2 onto a1's slot is a conflict...
    let err = office.reschedule("a2", &date, "09:00").unwrap_err();
    assert_eq!(
        err,
        OfficeError::Conflict("This patient already has an appointment at this time!".into())
    );

    // ...but moving it to a free slot is not, even with its own record in
    // the collection.
    let moved = office.reschedule("a2", &date, "10:30")?;
    assert_eq!(moved.status, AppointmentStatus::Confirmed);
    assert_eq!(moved.time, "10:30");
    assert_eq!(office.store().notifications[0].message, "Rescheduled Successfully");
    Ok(())
}

#[test]
fn rebook_of_a_past_no_show_clones_into_a_new_record() -> Result<()> {
    let api = seeded_api();
    api.seed_appointment(appointment("a1", "p1", &rel_date(-1), "09:00", AppointmentStatus::Pending));

    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    let plan = office.begin_rebook("a1")?;
    assert_eq!(plan.mode, RebookMode::Clone);
    assert_eq!(plan.form.date, rel_date(0));
    assert!(plan.form.time.is_empty());
    assert_eq!(plan.form.department, "Cardiology");

    let mut form = plan.form;
    form.time = "11:00".into();
    let booked = office.book(&form)?;

    assert_ne!(booked.id, "a1");
    // The original no-show stays in the collection untouched.
    assert_eq!(
        office.store().appointment_by_id("a1").unwrap().status,
        AppointmentStatus::Pending
    );
    assert_eq!(office.store().appointments.len(), 2);
    Ok(())
}

#[test]
fn rebook_of_a_future_cancellation_reuses_the_record() -> Result<()> {
    let api = seeded_api();
    api.seed_appointment(appointment("a1", "p1", &rel_date(2), "09:00", AppointmentStatus::Cancelled));

    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    let plan = office.begin_rebook("a1")?;
    assert_eq!(plan.mode, RebookMode::ReuseRecord);
    assert_eq!(plan.form.rebooking_id.as_deref(), Some("a1"));

    let mut form = plan.form;
    form.time = "11:00".into();
    let booked = office.book(&form)?;

    assert_eq!(booked.id, "a1");
    assert_eq!(booked.status, AppointmentStatus::Pending);
    assert_eq!(office.store().appointments.len(), 1);
    assert_eq!(office.store().notifications[0].message, "Appointment Updated");
    Ok(())
}

#[test]
fn no_show_is_display_only() -> Result<()> {
    let api = seeded_api();
    api.seed_appointment(appointment("a1", "p1", &rel_date(-1), "09:00", AppointmentStatus::Pending));

    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    let today = rel_date(0);
    let appt = office.store().appointment_by_id("a1").unwrap();
    assert!(appt.is_no_show(&today));

    let sections = classify_appointments(&office.store().appointments, &today);
    assert_eq!(sections.previous.len(), 1);
    // Classification never rewrites the stored status.
    assert_eq!(sections.previous[0].status, AppointmentStatus::Pending);
    Ok(())
}

#[test]
fn sections_partition_yesterday_today_tomorrow() -> Result<()> {
    let api = seeded_api();
    api.seed_appointment(appointment("a1", "p1", &rel_date(-1), "14:00", AppointmentStatus::Completed));
    api.seed_appointment(appointment("a2", "p1", &rel_date(0), "10:30", AppointmentStatus::Pending));
    api.seed_appointment(appointment("a3", "p2", &rel_date(0), "09:00", AppointmentStatus::Confirmed));
    api.seed_appointment(appointment("a4", "p2", &rel_date(1), "11:00", AppointmentStatus::Pending));

    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    let sections = classify_appointments(&office.store().appointments, &rel_date(0));
    assert_eq!(sections.previous.len(), 1);
    assert_eq!(sections.upcoming.len(), 1);
    let today_ids: Vec<&str> = sections.today.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(today_ids, vec!["a3", "a2"]);
    Ok(())
}

#[test]
fn doctor_deactivation_requires_a_reason() -> Result<()> {
    let api = seeded_api();
    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    let err = office.deactivate_doctor("d1", "").unwrap_err();
    assert!(matches!(err, OfficeError::Validation { .. }));
    assert_eq!(api.write_calls(), 0);

    let inactive = office.deactivate_doctor("d1", "Extended leave")?;
    assert_eq!(inactive.status, DoctorStatus::Inactive);
    assert_eq!(inactive.reason.as_deref(), Some("Extended leave"));

    let active = office.activate_doctor("d1")?;
    assert_eq!(active.status, DoctorStatus::Available);
    assert!(active.reason.is_none());
    Ok(())
}

#[test]
fn new_patients_start_fresh_regardless_of_form_input() -> Result<()> {
    let api = seeded_api();
    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;

    let created = office.save_patient(&PatientForm {
        name: "Charlie Brown".into(),
        age: Some(50),
        gender: "M".into(),
        phone: "555-5555".into(),
        address: "202 Cedar St".into(),
        ..PatientForm::default()
    })?;
    assert_eq!(created.patient_type, PatientType::New);
    assert_eq!(created.last_visit, NO_VISIT);
    assert_eq!(office.store().patients[0].id, created.id);
    Ok(())
}

#[test]
fn clinic_settings_load_and_partial_update() -> Result<()> {
    use careopd_core::api::ClinicPatch;
    use careopd_core::models::{ClinicProfile, MessageTemplate};

    let api = seeded_api();
    api.set_clinic(ClinicProfile {
        name: "CareOPD General Clinic".into(),
        hours: "09:00 AM - 06:00 PM".into(),
        ..ClinicProfile::default()
    });

    let mut office = FrontOffice::with_session(&api, session());
    office.load_clinic()?;
    assert_eq!(office.store().clinic.name, "CareOPD General Clinic");

    let updated = office.update_clinic_settings(&ClinicPatch {
        hours: Some("08:00 AM - 08:00 PM".into()),
        templates: Some(vec![MessageTemplate {
            title: "Appointment Reminder".into(),
            text: "Hello {patient_name}, reminder for your appointment at {time}.".into(),
        }]),
        ..ClinicPatch::default()
    })?;

    // Untouched fields survive the partial update.
    assert_eq!(updated.name, "CareOPD General Clinic");
    assert_eq!(office.store().clinic.hours, "08:00 AM - 08:00 PM");
    assert_eq!(office.store().clinic.templates.len(), 1);
    Ok(())
}

#[test]
fn sign_out_clears_the_session_snapshot() -> Result<()> {
    let api = seeded_api();
    let mut office = FrontOffice::with_session(&api, session());
    office.refresh()?;
    assert!(!office.store().patients.is_empty());

    office.sign_out();
    assert!(office.store().session.is_none());
    assert!(office.store().patients.is_empty());
    assert_eq!(office.refresh()?, RefreshOutcome::NotSignedIn);
    Ok(())
}
