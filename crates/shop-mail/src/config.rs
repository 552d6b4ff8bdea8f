//! # Mail Configuration
//!
//! Sender identity and SendGrid credentials, loaded from environment
//! variables.

use secrecy::SecretString;
use shop_core::{ShopError, ShopResult};
use std::env;
use std::time::Duration;

pub const DEFAULT_FROM_EMAIL: &str = "orders@sparkshop.io";
pub const DEFAULT_FROM_NAME: &str = "Spark Shop";
pub const DEFAULT_SUPPORT_EMAIL: &str = "support@sparkshop.io";
pub const SENDGRID_API_BASE_URL: &str = "https://api.sendgrid.com";

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SendGrid API key (SG....). `None` means log-only delivery.
    pub api_key: Option<SecretString>,

    pub from_email: String,

    pub from_name: String,

    /// Shown in the help section of confirmation emails
    pub support_email: String,

    /// Order tracking page; emails link to `<url>?order=<id>`
    pub tracking_url: Option<String>,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `SENDGRID_API_KEY` (must start with `SG.`)
    /// - `MAIL_FROM`, `MAIL_FROM_NAME`, `SUPPORT_EMAIL`
    /// - `ORDER_TRACKING_URL`
    pub fn from_env() -> ShopResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let mut config = Self::default();

        if let Some(key) = non_empty_var("SENDGRID_API_KEY") {
            if !key.starts_with("SG.") {
                return Err(ShopError::configuration("SENDGRID_API_KEY must start with SG."));
            }
            config = config.with_api_key(key);
        }
        if let Some(from) = non_empty_var("MAIL_FROM") {
            config.from_email = from;
        }
        if let Some(name) = non_empty_var("MAIL_FROM_NAME") {
            config.from_name = name;
        }
        if let Some(support) = non_empty_var("SUPPORT_EMAIL") {
            config.support_email = support;
        }
        config.tracking_url = non_empty_var("ORDER_TRACKING_URL");

        Ok(config)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_tracking_url(mut self, url: impl Into<String>) -> Self {
        self.tracking_url = Some(url.into());
        self
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from_email: DEFAULT_FROM_EMAIL.to_string(),
            from_name: DEFAULT_FROM_NAME.to_string(),
            support_email: DEFAULT_SUPPORT_EMAIL.to_string(),
            tracking_url: None,
            api_base_url: SENDGRID_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MailConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.from_email, DEFAULT_FROM_EMAIL);
        assert_eq!(config.api_base_url, "https://api.sendgrid.com");
    }

    #[test]
    fn test_api_key_is_redacted() {
        let config = MailConfig::default().with_api_key("SG.very-secret");
        assert!(!format!("{:?}", config).contains("very-secret"));
    }
}
