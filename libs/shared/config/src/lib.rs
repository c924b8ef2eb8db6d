use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub outbox_dir: PathBuf,
    pub templates_dir: PathBuf,
    pub email_gateway_url: String,
    pub email_gateway_key: String,
    pub email_from_address: String,
    pub sms_gateway_url: String,
    pub sms_gateway_key: String,
    pub sms_sender_id: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            data_dir: env::var("CLINIC_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("CLINIC_DATA_DIR not set, using ./data");
                    PathBuf::from("data")
                }),
            outbox_dir: env::var("CLINIC_OUTBOX_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("CLINIC_OUTBOX_DIR not set, using ./outbox");
                    PathBuf::from("outbox")
                }),
            templates_dir: env::var("CLINIC_TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("CLINIC_TEMPLATES_DIR not set, using ./templates");
                    PathBuf::from("templates")
                }),
            email_gateway_url: env::var("EMAIL_GATEWAY_URL").unwrap_or_else(|_| {
                warn!("EMAIL_GATEWAY_URL not set, email delivery disabled (outbox only)");
                String::new()
            }),
            email_gateway_key: env::var("EMAIL_GATEWAY_KEY").unwrap_or_default(),
            email_from_address: env::var("EMAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| "frontdesk@clinic.example".to_string()),
            sms_gateway_url: env::var("SMS_GATEWAY_URL").unwrap_or_else(|_| {
                warn!("SMS_GATEWAY_URL not set, SMS delivery disabled (outbox only)");
                String::new()
            }),
            sms_gateway_key: env::var("SMS_GATEWAY_KEY").unwrap_or_default(),
            sms_sender_id: env::var("SMS_SENDER_ID").unwrap_or_else(|_| "CLINIC".to_string()),
        };

        if !config.is_email_configured() && !config.is_sms_configured() {
            warn!("No live delivery gateway configured - notifications archive to outbox only");
        }

        config
    }

    pub fn is_email_configured(&self) -> bool {
        !self.email_gateway_url.is_empty() && !self.email_gateway_key.is_empty()
    }

    pub fn is_sms_configured(&self) -> bool {
        !self.sms_gateway_url.is_empty() && !self.sms_gateway_key.is_empty()
    }

    /// Config rooted at an arbitrary base directory. Tests point this at a
    /// temp dir so every run gets an isolated data/outbox/templates tree.
    pub fn with_base_dir(base: &Path) -> Self {
        Self {
            data_dir: base.join("data"),
            outbox_dir: base.join("outbox"),
            templates_dir: base.join("templates"),
            email_gateway_url: String::new(),
            email_gateway_key: String::new(),
            email_from_address: "frontdesk@clinic.example".to_string(),
            sms_gateway_url: String::new(),
            sms_gateway_key: String::new(),
            sms_sender_id: "CLINIC".to_string(),
        }
    }
}
