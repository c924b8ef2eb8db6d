use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_store::TableStore;

use crate::models::{AvailabilityEntry, Slot};

/// Computes open slots by subtracting booked, non-cancelled appointments
/// from the doctor's declared availability calendar.
///
/// Appointments are read as loose JSON rows rather than a typed model:
/// the resolver only cares about four columns, tolerates rows missing any
/// of them, and must not depend on the appointment cell (which sits above
/// this one in the dependency graph).
pub struct AvailabilityService {
    calendar: TableStore<AvailabilityEntry>,
    appointments: TableStore<Value>,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            calendar: TableStore::new(config.data_dir.join("availability.json")),
            appointments: TableStore::new(config.data_dir.join("appointments.json")),
        }
    }

    /// Open (date, time) pairs for a doctor+location, sorted ascending.
    /// Doctor and location are expected pre-normalized to canonical forms;
    /// matching is a case-insensitive exact comparison. An absent calendar
    /// or appointment table yields an empty result, never an error.
    pub async fn open_slots(&self, doctor: &str, location: &str) -> Vec<Slot> {
        let declared: Vec<Slot> = self
            .calendar
            .get_all()
            .await
            .into_iter()
            .filter(|entry| {
                entry.doctor_name.eq_ignore_ascii_case(doctor)
                    && entry.location.eq_ignore_ascii_case(location)
            })
            .map(|entry| Slot::new(entry.date, entry.time))
            .collect();

        if declared.is_empty() {
            debug!("no declared availability for {} at {}", doctor, location);
            return Vec::new();
        }

        let occupied = self.occupied_slots(doctor, location).await;

        let mut open: Vec<Slot> = declared
            .into_iter()
            .filter(|slot| !occupied.contains(slot))
            .collect();
        open.sort();

        debug!("{} open slots for {} at {}", open.len(), doctor, location);
        open
    }

    /// (date, time) pairs held by active appointments for this doctor+location.
    /// A row with no status column counts as active; rows missing doctor,
    /// location, date or time are skipped.
    async fn occupied_slots(&self, doctor: &str, location: &str) -> HashSet<Slot> {
        let mut occupied = HashSet::new();

        for row in self.appointments.get_all().await {
            let field = |name: &str| row.get(name).and_then(Value::as_str);

            let (Some(row_doctor), Some(row_location)) = (field("doctor_name"), field("location"))
            else {
                continue;
            };
            if !row_doctor.eq_ignore_ascii_case(doctor) || !row_location.eq_ignore_ascii_case(location)
            {
                continue;
            }

            let status = field("status").unwrap_or("");
            if status.eq_ignore_ascii_case("cancelled") {
                continue;
            }

            if let (Some(date), Some(time)) = (field("date"), field("time")) {
                occupied.insert(Slot::new(date, time));
            }
        }

        occupied
    }
}
