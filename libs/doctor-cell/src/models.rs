use serde::{Deserialize, Serialize};

/// One declared open slot on a doctor's calendar. Reference data, never
/// mutated by the booking flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub doctor_name: String,
    pub location: String,
    pub date: String,
    pub time: String,
}

/// A bookable (date, time) pair. Ordering is lexicographic on date then
/// time, which matches the clinic's zero-padded `YYYY-MM-DD` / `HH:MM`
/// string formats.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub date: String,
    pub time: String,
}

impl Slot {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenSlotsQuery {
    pub doctor: String,
    pub location: String,
}
