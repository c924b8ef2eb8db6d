use tracing::{info, warn};

use shared_config::AppConfig;

use crate::models::{DeliveryReceipt, NotificationError, SendRequest};
use crate::services::gateway::GatewayClient;
use crate::services::outbox::OutboxArchive;

/// The notification sink every other cell talks to. Always archives a copy
/// to the outbox, then attempts live delivery; never raises either way.
pub struct NotificationSink {
    outbox: OutboxArchive,
    gateway: GatewayClient,
}

impl NotificationSink {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            outbox: OutboxArchive::new(&config.outbox_dir),
            gateway: GatewayClient::new(config),
        }
    }

    pub async fn send(&self, request: SendRequest) -> DeliveryReceipt {
        let archived_to = match self.outbox.archive(&request).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("[outbox {} write failed] {}", request.channel, e);
                None
            }
        };

        let delivered = match self.gateway.deliver(&request).await {
            Ok(()) => true,
            Err(NotificationError::NotConfigured(channel)) => {
                info!("[{} not sent] gateway unconfigured; saved to outbox only", channel);
                false
            }
            Err(e) => {
                warn!("[{} failed] {}", request.channel, e);
                false
            }
        };

        DeliveryReceipt { delivered, archived_to }
    }
}
