//! # SendGrid Notifier
//!
//! Sends rendered emails through the SendGrid v3 `mail/send` endpoint.
//! A `202 Accepted` is success; the message id comes back in the
//! `X-Message-Id` header.

use crate::config::MailConfig;
use crate::templates::{self, Branding, RenderedEmail};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use shop_core::notify::{DeliveryReceipt, DeliveryStatus, Notifier, NotifyError, OrderConfirmation};
use shop_core::{ShopError, ShopResult};
use tracing::{debug, error, instrument};

const PROVIDER: &str = "sendgrid";

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    value: &'a str,
}

/// SendGrid-backed [`Notifier`]
pub struct SendGridNotifier {
    config: MailConfig,
    client: Client,
}

impl SendGridNotifier {
    /// Requires `config.api_key`
    pub fn new(config: MailConfig) -> ShopResult<Self> {
        if config.api_key.is_none() {
            return Err(ShopError::configuration("SENDGRID_API_KEY not set"));
        }
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ShopError::configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        Self::new(MailConfig::from_env()?)
    }

    fn branding(&self) -> Branding<'_> {
        Branding {
            store_name: &self.config.from_name,
            support_email: &self.config.support_email,
            tracking_url: self.config.tracking_url.as_deref(),
        }
    }

    async fn deliver(&self, recipient: &str, email: &RenderedEmail) -> Result<DeliveryReceipt, NotifyError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| NotifyError::Config("SENDGRID_API_KEY not set".to_string()))?;

        let body = MailSendRequest {
            personalizations: vec![Personalization {
                to: vec![Address { email: recipient, name: None }],
            }],
            from: Address {
                email: &self.config.from_email,
                name: Some(&self.config.from_name),
            },
            subject: &email.subject,
            content: vec![
                Content { kind: "text/plain", value: &email.text },
                Content { kind: "text/html", value: &email.html },
            ],
        };

        let url = format!("{}/v3/mail/send", self.config.api_base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        let message_id = response
            .headers()
            .get("X-Message-Id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("SendGrid API error: status={}, body={}", status, body);
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(message_id = message_id.as_deref().unwrap_or("-"), "SendGrid accepted message");
        Ok(DeliveryReceipt {
            provider: PROVIDER,
            message_id,
        })
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    #[instrument(skip(self, confirmation), fields(order_id = %confirmation.order_id))]
    async fn send_order_confirmation(
        &self,
        confirmation: &OrderConfirmation,
        recipient: &str,
    ) -> Result<DeliveryReceipt, NotifyError> {
        let email = templates::order_confirmation(confirmation, recipient, self.branding())?;
        self.deliver(recipient, &email).await
    }

    #[instrument(skip(self))]
    async fn send_status_update(
        &self,
        order_id: &str,
        recipient: &str,
        status: &DeliveryStatus,
        tracking_url: Option<&str>,
    ) -> Result<DeliveryReceipt, NotifyError> {
        let email = templates::status_update(order_id, status, tracking_url)?;
        self.deliver(recipient, &email).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
