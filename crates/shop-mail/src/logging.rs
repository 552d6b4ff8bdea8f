//! Log-only notifier, used when no mail provider is configured.

use crate::config::MailConfig;
use crate::templates::{self, Branding};
use async_trait::async_trait;
use shop_core::notify::{DeliveryReceipt, DeliveryStatus, Notifier, NotifyError, OrderConfirmation};
use tracing::info;

const PROVIDER: &str = "log";

/// Renders emails and writes them to the log instead of sending them
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    config: MailConfig,
}

impl LogNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_order_confirmation(
        &self,
        confirmation: &OrderConfirmation,
        recipient: &str,
    ) -> Result<DeliveryReceipt, NotifyError> {
        let branding = Branding {
            store_name: &self.config.from_name,
            support_email: &self.config.support_email,
            tracking_url: self.config.tracking_url.as_deref(),
        };
        let email = templates::order_confirmation(confirmation, recipient, branding)?;
        info!(
            to = recipient,
            subject = %email.subject,
            order_id = %confirmation.order_id,
            "Order confirmation (not sent, no mail provider)\n{}",
            email.text
        );
        Ok(DeliveryReceipt {
            provider: PROVIDER,
            message_id: None,
        })
    }

    async fn send_status_update(
        &self,
        order_id: &str,
        recipient: &str,
        status: &DeliveryStatus,
        tracking_url: Option<&str>,
    ) -> Result<DeliveryReceipt, NotifyError> {
        let email = templates::status_update(order_id, status, tracking_url)?;
        info!(
            to = recipient,
            subject = %email.subject,
            order_id,
            "Status update (not sent, no mail provider)"
        );
        Ok(DeliveryReceipt {
            provider: PROVIDER,
            message_id: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_status_update_succeeds_without_provider() {
        let notifier = LogNotifier::default();
        let receipt = notifier
            .send_status_update("0123456789ab", "ada@example.com", &DeliveryStatus::Shipped, None)
            .await
            .unwrap();
        assert_eq!(receipt.provider, "log");
        assert!(receipt.message_id.is_none());
    }
}
