use std::path::Path;

use serde_json::json;
use tempfile::TempDir;

use doctor_cell::services::availability::AvailabilityService;
use doctor_cell::Slot;
use shared_config::AppConfig;

async fn write_table(data_dir: &Path, name: &str, rows: serde_json::Value) {
    tokio::fs::create_dir_all(data_dir).await.unwrap();
    tokio::fs::write(data_dir.join(name), serde_json::to_vec_pretty(&rows).unwrap())
        .await
        .unwrap();
}

fn calendar_rows() -> serde_json::Value {
    json!([
        {"doctor_name": "Dr. Priya Rao", "location": "MG Road Clinic", "date": "2026-09-02", "time": "11:00"},
        {"doctor_name": "Dr. Priya Rao", "location": "MG Road Clinic", "date": "2026-09-01", "time": "10:00"},
        {"doctor_name": "Dr. Priya Rao", "location": "MG Road Clinic", "date": "2026-09-01", "time": "14:00"},
        {"doctor_name": "Dr. Mehul Shah", "location": "HSR Layout Clinic", "date": "2026-09-01", "time": "10:00"}
    ])
}

#[tokio::test]
async fn booked_slots_are_excluded_and_rest_sorted() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());
    write_table(&config.data_dir, "availability.json", calendar_rows()).await;
    write_table(
        &config.data_dir,
        "appointments.json",
        json!([
            {
                "appointment_id": "aaaa1111",
                "doctor_name": "Dr. Priya Rao",
                "location": "MG Road Clinic",
                "date": "2026-09-01",
                "time": "10:00",
                "status": "booked"
            }
        ]),
    )
    .await;

    let service = AvailabilityService::new(&config);
    let slots = service.open_slots("Dr. Priya Rao", "MG Road Clinic").await;

    assert_eq!(
        slots,
        vec![
            Slot::new("2026-09-01", "14:00"),
            Slot::new("2026-09-02", "11:00"),
        ]
    );
}

#[tokio::test]
async fn cancelled_appointment_frees_its_slot() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());
    write_table(&config.data_dir, "availability.json", calendar_rows()).await;
    write_table(
        &config.data_dir,
        "appointments.json",
        json!([
            {
                "appointment_id": "aaaa1111",
                "doctor_name": "Dr. Priya Rao",
                "location": "MG Road Clinic",
                "date": "2026-09-01",
                "time": "10:00",
                "status": "cancelled"
            }
        ]),
    )
    .await;

    let service = AvailabilityService::new(&config);
    let slots = service.open_slots("Dr. Priya Rao", "MG Road Clinic").await;
    assert!(slots.contains(&Slot::new("2026-09-01", "10:00")));
}

#[tokio::test]
async fn appointment_without_status_still_occupies() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());
    write_table(&config.data_dir, "availability.json", calendar_rows()).await;
    write_table(
        &config.data_dir,
        "appointments.json",
        json!([
            {
                "doctor_name": "Dr. Priya Rao",
                "location": "MG Road Clinic",
                "date": "2026-09-01",
                "time": "10:00"
            }
        ]),
    )
    .await;

    let service = AvailabilityService::new(&config);
    let slots = service.open_slots("Dr. Priya Rao", "MG Road Clinic").await;
    assert!(!slots.contains(&Slot::new("2026-09-01", "10:00")));
}

#[tokio::test]
async fn missing_tables_mean_no_slots() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());

    let service = AvailabilityService::new(&config);
    let slots = service.open_slots("Dr. Priya Rao", "MG Road Clinic").await;
    assert!(slots.is_empty());
}

#[tokio::test]
async fn other_doctors_bookings_do_not_block() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::with_base_dir(dir.path());
    write_table(&config.data_dir, "availability.json", calendar_rows()).await;
    write_table(
        &config.data_dir,
        "appointments.json",
        json!([
            {
                "doctor_name": "Dr. Mehul Shah",
                "location": "HSR Layout Clinic",
                "date": "2026-09-01",
                "time": "10:00",
                "status": "booked"
            }
        ]),
    )
    .await;

    let service = AvailabilityService::new(&config);
    let slots = service.open_slots("Dr. Priya Rao", "MG Road Clinic").await;
    assert!(slots.contains(&Slot::new("2026-09-01", "10:00")));
}
