use anyhow::Result;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::models::{Channel, NotificationError, SendRequest};

/// HTTP client for the live delivery gateways (transactional email / SMS).
/// One POST per message; no retries.
pub struct GatewayClient {
    client: Client,
    config: AppConfig,
}

impl GatewayClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    /// Attempt live delivery. Returns `NotConfigured` when the channel has
    /// no gateway credentials, so callers can fall back to outbox-only.
    pub async fn deliver(&self, request: &SendRequest) -> Result<(), NotificationError> {
        match request.channel {
            Channel::Email => self.deliver_email(request).await,
            Channel::Sms => self.deliver_sms(request).await,
        }
    }

    async fn deliver_email(&self, request: &SendRequest) -> Result<(), NotificationError> {
        if !self.config.is_email_configured() {
            return Err(NotificationError::NotConfigured(Channel::Email));
        }

        let attachment_name = request
            .attachment
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string());

        let payload = json!({
            "from": self.config.email_from_address,
            "to": request.destination,
            "subject": request.subject.as_deref().unwrap_or(""),
            "body": request.body,
            "attachment_name": attachment_name,
        });

        debug!("Posting email to gateway: {}", self.config.email_gateway_url);
        self.post(&self.config.email_gateway_url, &self.config.email_gateway_key, payload)
            .await?;

        info!("[email sent] to {}", request.destination);
        Ok(())
    }

    async fn deliver_sms(&self, request: &SendRequest) -> Result<(), NotificationError> {
        if !self.config.is_sms_configured() {
            return Err(NotificationError::NotConfigured(Channel::Sms));
        }

        let payload = json!({
            "sender_id": self.config.sms_sender_id,
            "to": request.destination,
            "body": request.body,
        });

        debug!("Posting SMS to gateway: {}", self.config.sms_gateway_url);
        self.post(&self.config.sms_gateway_url, &self.config.sms_gateway_key, payload)
            .await?;

        info!("[sms sent] to {}", request.destination);
        Ok(())
    }

    async fn post(
        &self,
        url: &str,
        api_key: &str,
        payload: serde_json::Value,
    ) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotificationError::GatewayError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Gateway rejected message: {} - {}", status, text);
            return Err(NotificationError::GatewayError(format!("HTTP {}: {}", status, text)));
        }

        Ok(())
    }
}
