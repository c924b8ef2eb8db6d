use std::path::PathBuf;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use notification_cell::{NotificationSink, SendRequest};
use shared_config::AppConfig;
use shared_store::TableStore;

use crate::models::{Appointment, ReminderTier};

/// Which reminder tier an appointment falls in, given hours until it
/// starts. Windows are checked in order and the first match wins; outside
/// every window nothing is due.
pub fn classify_tier(hours_to_go: f64) -> Option<ReminderTier> {
    if (71.0..=73.0).contains(&hours_to_go) {
        Some(ReminderTier::First)
    } else if (23.0..=25.0).contains(&hours_to_go) {
        Some(ReminderTier::Second)
    } else if (1.5..=2.5).contains(&hours_to_go) {
        Some(ReminderTier::Final)
    } else {
        None
    }
}

/// Scans the appointment table and sends tiered reminders for anything
/// whose start time falls inside a reminder window right now.
///
/// The scan is stateless: there is no ledger of already-sent reminders, so
/// running it twice inside the same window sends twice. The windows are
/// sized for an hourly schedule.
pub struct ReminderService {
    appointments: TableStore<Appointment>,
    sink: NotificationSink,
    attachment: Option<PathBuf>,
}

impl ReminderService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            appointments: TableStore::new(config.data_dir.join("appointments.json")),
            sink: NotificationSink::new(config),
            attachment: None,
        }
    }

    /// Attach a file (intake form, directions PDF) to every reminder email
    /// this scan sends. SMS reminders are unaffected.
    pub fn with_attachment(mut self, attachment: Option<PathBuf>) -> Self {
        self.attachment = attachment;
        self
    }

    pub async fn run(&self) -> Vec<String> {
        self.run_at(Local::now().naive_local()).await
    }

    /// Run the scan as of a specific day, anchored at 09:00. Used by the
    /// admin endpoint to replay a day's window.
    pub async fn run_for_day(&self, today: &str) -> Result<Vec<String>, chrono::ParseError> {
        let base = NaiveDate::parse_from_str(today, "%Y-%m-%d")?
            .and_hms_opt(9, 0, 0)
            .unwrap_or_default();
        Ok(self.run_at(base).await)
    }

    pub async fn run_at(&self, now: NaiveDateTime) -> Vec<String> {
        let mut logs = Vec::new();
        let appointments = self.appointments.get_all().await;
        if appointments.is_empty() {
            logs.push("No appointments.".to_string());
            info!("No appointments.");
            return logs;
        }

        for appt in &appointments {
            if !appt.status.is_active() {
                continue;
            }
            let start = match parse_start(&appt.date, &appt.time) {
                Some(dt) => dt,
                None => {
                    warn!(
                        "Skipping {}: unparseable start {} {}",
                        appt.appointment_id, appt.date, appt.time
                    );
                    continue;
                }
            };

            let hours_to_go = (start - now).num_seconds() as f64 / 3600.0;
            let Some(tier) = classify_tier(hours_to_go) else {
                continue;
            };

            let message = self.message_for(tier, appt);
            if !appt.contact_phone.is_empty() {
                self.sink
                    .send(SendRequest::sms(appt.contact_phone.clone(), message.clone()))
                    .await;
            }
            if !appt.contact_email.is_empty() {
                self.sink
                    .send(
                        SendRequest::email(
                            appt.contact_email.clone(),
                            format!("Reminder {}", tier.number()),
                            message,
                        )
                        .with_attachment(self.attachment.clone()),
                    )
                    .await;
            }

            let line = format!(
                "Sent reminder {} to {} -> {} / {}",
                tier.number(),
                appt.appointment_id,
                appt.contact_email,
                appt.contact_phone
            );
            info!("{line}");
            logs.push(line);
        }

        logs.push("Reminders processed based on current time window.".to_string());
        info!("Reminders processed based on current time window.");
        logs
    }

    fn message_for(&self, tier: ReminderTier, appt: &Appointment) -> String {
        match tier {
            ReminderTier::First => format!(
                "Reminder: appt on {} {} with {}. Reply YES to confirm.",
                appt.date, appt.time, appt.doctor_name
            ),
            ReminderTier::Second => {
                let forms = if appt.forms_filled { "YES" } else { "NO" };
                format!(
                    "Reminder 2: forms filled? {forms}. Reply YES to confirm visit, or C to cancel (give reason)."
                )
            }
            ReminderTier::Final => {
                "Final reminder: your appt is in ~2 hours. Reply YES to confirm or C to cancel (reason)."
                    .to_string()
            }
        }
    }
}

fn parse_start(date: &str, time: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").ok()
}
