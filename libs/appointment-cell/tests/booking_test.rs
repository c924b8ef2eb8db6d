use std::path::Path;

use assert_matches::assert_matches;
use serde_json::json;
use tempfile::TempDir;

use appointment_cell::models::{AppointmentError, AppointmentStatus, BookingRequest};
use appointment_cell::BookingService;
use patient_cell::{NewOrReturning, PatientService};
use shared_config::AppConfig;

async fn seed_availability(data_dir: &Path) {
    tokio::fs::create_dir_all(data_dir).await.unwrap();
    let rows = json!([
        {"doctor_name": "Dr. Priya Rao", "location": "MG Road Clinic", "date": "2026-09-01", "time": "10:00"},
        {"doctor_name": "Dr. Priya Rao", "location": "MG Road Clinic", "date": "2026-09-01", "time": "14:00"},
        {"doctor_name": "Dr. Priya Rao", "location": "MG Road Clinic", "date": "2026-09-02", "time": "11:00"}
    ]);
    tokio::fs::write(
        data_dir.join("availability.json"),
        serde_json::to_vec_pretty(&rows).unwrap(),
    )
    .await
    .unwrap();
}

fn request() -> BookingRequest {
    BookingRequest {
        first_name: "Asha".into(),
        last_name: "Verma".into(),
        dob: "1990-03-14".into(),
        doctor_name: "Dr. Priya Rao".into(),
        location: "MG Road Clinic".into(),
        email: "asha@example.com".into(),
        phone: "9876543210".into(),
        carrier: String::new(),
        member_id: String::new(),
        group_id: String::new(),
        date: None,
        time: None,
    }
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

#[tokio::test]
async fn new_patient_books_first_open_slot_for_sixty_minutes() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());
    seed_availability(&config.data_dir).await;

    let service = BookingService::new(&config);
    let appt = service.book(request()).await.unwrap();

    assert_eq!(appt.date, "2026-09-01");
    assert_eq!(appt.time, "10:00");
    assert_eq!(appt.duration_minutes, 60);
    assert_eq!(appt.status, AppointmentStatus::Booked);
    assert_eq!(appt.new_or_returning, NewOrReturning::New);
    assert!(appt.forms_sent);
    assert!(appt.confirmation_sent);
    assert!(!appt.forms_filled);
    assert_eq!(appt.appointment_id.len(), 8);

    // Audit snapshot plus outbox copies of both confirmations.
    assert!(config
        .data_dir
        .join("bookings")
        .join(format!("{}.json", appt.appointment_id))
        .exists());
    assert_eq!(count_files(&config.outbox_dir.join("emails")), 1);
    assert_eq!(count_files(&config.outbox_dir.join("sms")), 1);
}

#[tokio::test]
async fn returning_patient_reuses_id_and_gets_thirty_minutes() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());
    seed_availability(&config.data_dir).await;

    let service = BookingService::new(&config);
    let first = service.book(request()).await.unwrap();

    let mut second_request = request();
    second_request.first_name = "asha".into();
    second_request.last_name = "VERMA".into();
    let second = service.book(second_request).await.unwrap();

    assert_eq!(second.patient_id, first.patient_id);
    assert_eq!(second.new_or_returning, NewOrReturning::Returning);
    assert_eq!(second.duration_minutes, 30);
    // First slot is now occupied, so the next one is taken.
    assert_eq!((second.date.as_str(), second.time.as_str()), ("2026-09-01", "14:00"));
}

#[tokio::test]
async fn fuzzy_doctor_and_location_are_normalized() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());
    seed_availability(&config.data_dir).await;

    let mut req = request();
    req.doctor_name = "priya".into();
    req.location = "mg road".into();
    req.dob = "14/03/1990".into();

    let service = BookingService::new(&config);
    let appt = service.book(req).await.unwrap();

    assert_eq!(appt.doctor_name, "Dr. Priya Rao");
    assert_eq!(appt.location, "MG Road Clinic");
    assert_eq!(appt.dob, "1990-03-14");
}

#[tokio::test]
async fn unknown_doctor_is_rejected_without_writes() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());
    seed_availability(&config.data_dir).await;

    let mut req = request();
    req.doctor_name = "Dr. Nobody".into();

    let service = BookingService::new(&config);
    let err = service.book(req).await.unwrap_err();

    assert_matches!(err, AppointmentError::UnknownDoctor(_));
    assert!(!config.data_dir.join("patients.json").exists());
    assert!(!config.data_dir.join("appointments.json").exists());
}

#[tokio::test]
async fn no_open_slots_is_rejected_without_writes() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());

    let service = BookingService::new(&config);
    let err = service.book(request()).await.unwrap_err();

    assert_matches!(err, AppointmentError::NoAvailability);
    assert!(!config.data_dir.join("patients.json").exists());
    assert!(!config.data_dir.join("appointments.json").exists());
}

#[tokio::test]
async fn explicit_slot_must_be_open() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());
    seed_availability(&config.data_dir).await;

    let mut req = request();
    req.date = Some("2026-09-01".into());
    req.time = Some("09:00".into());

    let service = BookingService::new(&config);
    let err = service.book(req).await.unwrap_err();
    assert_matches!(err, AppointmentError::SlotUnavailable { .. });

    let mut req = request();
    req.date = Some("2026-09-02".into());
    req.time = Some("11:00".into());
    let appt = service.book(req).await.unwrap();
    assert_eq!((appt.date.as_str(), appt.time.as_str()), ("2026-09-02", "11:00"));
}

#[tokio::test]
async fn missing_required_field_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());
    seed_availability(&config.data_dir).await;

    let mut req = request();
    req.email = String::new();

    let service = BookingService::new(&config);
    let err = service.book(req).await.unwrap_err();
    assert_matches!(err, AppointmentError::MissingField("email"));
}

#[tokio::test]
async fn insurance_updates_only_supplied_fields() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());
    seed_availability(&config.data_dir).await;

    let service = BookingService::new(&config);
    let mut req = request();
    req.carrier = "Star Health".into();
    req.member_id = "SH-1001".into();
    let first = service.book(req).await.unwrap();

    let mut req = request();
    req.carrier = "Niva Bupa".into();
    service.book(req).await.unwrap();

    let patients = PatientService::new(&config);
    let patient = patients.get(first.patient_id).await.unwrap();
    assert_eq!(patient.insurance_carrier, "Niva Bupa");
    assert_eq!(patient.member_id, "SH-1001");
}
