//! # shop-mail
//!
//! Notification dispatchers for spark-shop.
//!
//! 1. **SendGridNotifier** - SendGrid v3 `mail/send` over HTTPS
//! 2. **LogNotifier** - writes each message to the log; used when no API
//!    key is configured
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_mail::{build_notifier, MailConfig};
//!
//! let config = MailConfig::from_env()?;
//! let notifier = build_notifier(&config)?;
//! let workflow = OrderWorkflow::new(store, notifier);
//! ```

pub mod config;
pub mod logging;
pub mod sendgrid;
pub mod templates;

// Re-exports
pub use config::MailConfig;
pub use logging::LogNotifier;
pub use sendgrid::SendGridNotifier;
pub use templates::RenderedEmail;

use shop_core::{BoxedNotifier, ShopResult};
use std::sync::Arc;

/// SendGrid when an API key is configured, otherwise the log notifier
pub fn build_notifier(config: &MailConfig) -> ShopResult<BoxedNotifier> {
    if config.api_key.is_some() {
        Ok(Arc::new(SendGridNotifier::new(config.clone())?))
    } else {
        tracing::warn!("SENDGRID_API_KEY not set, emails will only be logged");
        Ok(Arc::new(LogNotifier::new(config.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_notifier_picks_provider() {
        let logged = build_notifier(&MailConfig::default()).unwrap();
        assert_eq!(logged.provider_name(), "log");

        let sendgrid = build_notifier(&MailConfig::default().with_api_key("SG.test-key")).unwrap();
        assert_eq!(sendgrid.provider_name(), "sendgrid");
    }
}
