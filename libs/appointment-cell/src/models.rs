use serde::{Deserialize, Serialize};
use std::fmt;

use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Booked,
    Scheduled,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// One row of the `appointments.json` table. Patient identity fields are
/// denormalized onto the row so reminders and replies never need a join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: String,
    pub patient_id: u64,
    pub patient_name: String,
    pub dob: String,
    pub doctor_name: String,
    pub location: String,
    /// `YYYY-MM-DD`, clinic-local.
    pub date: String,
    /// `HH:MM`, clinic-local.
    pub time: String,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub insurance_carrier: String,
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub group_id: String,
    pub forms_sent: bool,
    pub forms_filled: bool,
    pub confirmation_sent: bool,
    pub created_at: String,
    pub updated_at: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub new_or_returning: patient_cell::NewOrReturning,
    #[serde(default)]
    pub cancellation_reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub doctor_name: String,
    pub location: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub carrier: String,
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub group_id: String,
    /// Optional explicit slot. When absent, the first open slot is taken.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

/// Reminder tiers, keyed by hours until the appointment. The windows are
/// disjoint so at most one tier fires per scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderTier {
    /// 71-73 hours out.
    First,
    /// 23-25 hours out.
    Second,
    /// 1.5-2.5 hours out.
    Final,
}

impl ReminderTier {
    pub fn number(&self) -> u8 {
        match self {
            ReminderTier::First => 1,
            ReminderTier::Second => 2,
            ReminderTier::Final => 3,
        }
    }
}

/// What an inbound patient reply asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyAction {
    Confirm,
    Cancel { reason: String },
    FormsFilled,
    Unrecognized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundReply {
    pub from_phone: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemindersRunRequest {
    /// Optional `YYYY-MM-DD`; the scan then runs as of 09:00 on that day.
    #[serde(default)]
    pub today: Option<String>,
    /// Optional server-side file to attach to every reminder email.
    #[serde(default)]
    pub attachment: Option<std::path::PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormsUpdateRequest {
    #[serde(default = "default_true")]
    pub filled: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelRequest {
    pub reason: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("Doctor not recognized: {0}")]
    UnknownDoctor(String),

    #[error("Location not recognized: {0}")]
    UnknownLocation(String),

    #[error("Could not parse DOB: {0}")]
    InvalidDob(String),

    #[error("No open slots found for doctor/location")]
    NoAvailability,

    #[error("Slot {date} {time} is not open")]
    SlotUnavailable { date: String, time: String },

    #[error("Appointment not found")]
    NotFound,

    #[error("No appointment found for that phone")]
    NoMatchForPhone,

    #[error("Unrecognized reply format. Use YES to confirm or C to cancel.")]
    UnrecognizedReply,

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::MissingField(_) => AppError::BadRequest(err.to_string()),
            AppointmentError::UnknownDoctor(_)
            | AppointmentError::UnknownLocation(_)
            | AppointmentError::InvalidDob(_)
            | AppointmentError::UnrecognizedReply => AppError::Unprocessable(err.to_string()),
            AppointmentError::NoAvailability | AppointmentError::SlotUnavailable { .. } => {
                AppError::Unprocessable(err.to_string())
            }
            AppointmentError::NotFound | AppointmentError::NoMatchForPhone => {
                AppError::NotFound(err.to_string())
            }
            AppointmentError::StorageError(msg) => AppError::Storage(msg),
        }
    }
}
