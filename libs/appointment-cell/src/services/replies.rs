use chrono::{Local, NaiveDateTime};
use tracing::info;

use shared_config::AppConfig;
use shared_store::TableStore;

use crate::models::{Appointment, AppointmentError, AppointmentStatus, ReplyAction};

/// Last ten digits of a phone number, ignoring formatting. Matches stored
/// numbers regardless of country code or punctuation.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > 10 {
        digits[digits.len() - 10..].to_string()
    } else {
        digits
    }
}

/// What a free-text reply asks for. Prefix checks are ordered so "yes"
/// and "cancel" keywords win over the looser forms match. The
/// cancellation reason keeps the sender's casing; only the checks are
/// case-insensitive.
pub fn classify_reply(text: &str) -> ReplyAction {
    let trimmed = text.trim();
    let body = trimmed.to_lowercase();
    if body.starts_with('y') {
        return ReplyAction::Confirm;
    }
    if body.starts_with('c') {
        let rest = if body.starts_with("cancel") {
            &trimmed["cancel".len()..]
        } else {
            &trimmed[1..]
        };
        let reason = rest.trim();
        let reason = if reason.is_empty() {
            "Cancelled via SMS".to_string()
        } else {
            reason.to_string()
        };
        return ReplyAction::Cancel { reason };
    }
    if body.contains("form") && (body.contains("yes") || body.contains("done")) {
        return ReplyAction::FormsFilled;
    }
    ReplyAction::Unrecognized
}

/// Applies inbound patient replies (simulated or webhook-delivered) to the
/// appointment they most plausibly refer to.
pub struct ReplyService {
    appointments: TableStore<Appointment>,
}

impl ReplyService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            appointments: TableStore::new(config.data_dir.join("appointments.json")),
        }
    }

    pub async fn process(&self, from_phone: &str, text: &str) -> Result<String, AppointmentError> {
        self.process_at(from_phone, text, Local::now().naive_local()).await
    }

    pub async fn process_at(
        &self,
        from_phone: &str,
        text: &str,
        now: NaiveDateTime,
    ) -> Result<String, AppointmentError> {
        if from_phone.trim().is_empty() {
            return Err(AppointmentError::MissingField("from_phone"));
        }
        if text.trim().is_empty() {
            return Err(AppointmentError::MissingField("text"));
        }

        let appointment_id = self.target_appointment(from_phone, now).await?;
        let action = classify_reply(text);
        let now_str = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let message = match &action {
            ReplyAction::Confirm => {
                self.mutate(&appointment_id, |a| {
                    a.status = AppointmentStatus::Confirmed;
                    a.confirmation_sent = true;
                    a.updated_at = now_str.clone();
                })
                .await?;
                format!("Appointment {appointment_id} marked confirmed.")
            }
            ReplyAction::Cancel { reason } => {
                self.mutate(&appointment_id, |a| {
                    a.status = AppointmentStatus::Cancelled;
                    a.cancellation_reason = reason.clone();
                    a.updated_at = now_str.clone();
                })
                .await?;
                format!("Appointment {appointment_id} cancelled (reason: {reason}).")
            }
            ReplyAction::FormsFilled => {
                self.mutate(&appointment_id, |a| {
                    a.forms_filled = true;
                    a.updated_at = now_str.clone();
                })
                .await?;
                format!("Appointment {appointment_id} forms_filled=true.")
            }
            ReplyAction::Unrecognized => return Err(AppointmentError::UnrecognizedReply),
        };

        info!("{message}");
        Ok(message)
    }

    /// The appointment a reply refers to: the caller's nearest upcoming
    /// appointment, falling back to their most recent past one.
    async fn target_appointment(
        &self,
        from_phone: &str,
        now: NaiveDateTime,
    ) -> Result<String, AppointmentError> {
        let norm = normalize_phone(from_phone);
        let rows = self.appointments.get_all().await;
        if rows.is_empty() {
            return Err(AppointmentError::NoMatchForPhone);
        }

        let mut candidates: Vec<(NaiveDateTime, String)> = rows
            .iter()
            .filter(|a| normalize_phone(&a.contact_phone) == norm)
            .filter_map(|a| {
                NaiveDateTime::parse_from_str(
                    &format!("{} {}", a.date, a.time),
                    "%Y-%m-%d %H:%M",
                )
                .ok()
                .map(|dt| (dt, a.appointment_id.clone()))
            })
            .collect();
        if candidates.is_empty() {
            return Err(AppointmentError::NoMatchForPhone);
        }

        candidates.sort_by(|a, b| a.0.cmp(&b.0));
        let chosen = candidates
            .iter()
            .find(|(dt, _)| *dt >= now)
            .or_else(|| candidates.last())
            .map(|(_, id)| id.clone());
        chosen.ok_or(AppointmentError::NoMatchForPhone)
    }

    async fn mutate<F>(&self, appointment_id: &str, mutate: F) -> Result<(), AppointmentError>
    where
        F: FnMut(&mut Appointment),
    {
        let updated = self
            .appointments
            .update_where(|a| a.appointment_id == appointment_id, mutate)
            .await
            .map_err(|e| AppointmentError::StorageError(e.to_string()))?;
        if updated == 0 {
            return Err(AppointmentError::NotFound);
        }
        Ok(())
    }
}
