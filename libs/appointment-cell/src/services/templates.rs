use std::path::{Path, PathBuf};

use crate::models::Appointment;

const DEFAULT_EMAIL_TEMPLATE: &str = "Hello {name},\n\nYour appointment is {status_lower}.\n\
Date: {date}\nTime: {time}\nDoctor: {doctor}\nLocation: {location}\n\
Duration: {duration} minutes\n\nThanks.";

const DEFAULT_SMS_TEMPLATE: &str =
    "Appt {status} {date} {time} with {doctor} at {location} ({duration} min).";

/// Message templates for confirmations. Files under the templates directory
/// override the built-in defaults, so the front desk can reword messages
/// without a redeploy.
pub struct MessageTemplates {
    dir: PathBuf,
}

impl MessageTemplates {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }

    pub fn email_body(&self, appt: &Appointment, status: &str) -> String {
        render(&self.load("email_template.txt", DEFAULT_EMAIL_TEMPLATE), appt, status)
    }

    pub fn sms_body(&self, appt: &Appointment, status: &str) -> String {
        render(&self.load("sms_template.txt", DEFAULT_SMS_TEMPLATE), appt, status)
    }

    /// Intake form PDF to attach to confirmations, if one is present.
    pub fn intake_form(&self) -> Option<PathBuf> {
        let path = self.dir.join("intake_form.pdf");
        path.exists().then_some(path)
    }

    fn load(&self, name: &str, default: &str) -> String {
        std::fs::read_to_string(self.dir.join(name)).unwrap_or_else(|_| default.to_string())
    }
}

fn render(template: &str, appt: &Appointment, status: &str) -> String {
    template
        .replace("{name}", &appt.patient_name)
        .replace("{status_lower}", &status.to_lowercase())
        .replace("{status}", status)
        .replace("{date}", &appt.date)
        .replace("{time}", &appt.time)
        .replace("{doctor}", &appt.doctor_name)
        .replace("{location}", &appt.location)
        .replace("{duration}", &appt.duration_minutes.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use patient_cell::NewOrReturning;
    use tempfile::TempDir;

    fn sample() -> Appointment {
        Appointment {
            appointment_id: "a1b2c3d4".into(),
            patient_id: 1,
            patient_name: "Asha Verma".into(),
            dob: "1990-03-14".into(),
            doctor_name: "Dr. Priya Rao".into(),
            location: "MG Road Clinic".into(),
            date: "2026-09-01".into(),
            time: "10:00".into(),
            duration_minutes: 60,
            status: AppointmentStatus::Booked,
            insurance_carrier: String::new(),
            member_id: String::new(),
            group_id: String::new(),
            forms_sent: true,
            forms_filled: false,
            confirmation_sent: true,
            created_at: "2026-08-24 09:00:00".into(),
            updated_at: "2026-08-24 09:00:00".into(),
            contact_email: "asha@example.com".into(),
            contact_phone: "9876543210".into(),
            new_or_returning: NewOrReturning::New,
            cancellation_reason: String::new(),
        }
    }

    #[test]
    fn default_email_template_fills_every_placeholder() {
        let dir = TempDir::new().unwrap();
        let templates = MessageTemplates::new(dir.path());
        let body = templates.email_body(&sample(), "CONFIRMED");

        assert!(body.contains("Hello Asha Verma,"));
        assert!(body.contains("Your appointment is confirmed."));
        assert!(body.contains("Duration: 60 minutes"));
        assert!(!body.contains('{'));
    }

    #[test]
    fn file_template_overrides_default() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("sms_template.txt"), "See you {date} at {time}!").unwrap();
        let templates = MessageTemplates::new(dir.path());

        let body = templates.sms_body(&sample(), "CONFIRMED");
        assert_eq!(body, "See you 2026-09-01 at 10:00!");
    }
}
