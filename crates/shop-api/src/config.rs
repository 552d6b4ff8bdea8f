//! # Application Configuration
//!
//! Server, identity and payment-key settings loaded from environment
//! variables. Database and mail settings live in `shop-db` and
//! `shop-mail`.

use secrecy::{ExposeSecret, SecretString};
use shop_core::auth::DEFAULT_TOKEN_TTL_HOURS;
use shop_core::{ShopError, ShopResult};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEV_JWT_SECRET: &str = "dev_secret";
pub const DEV_PAYMENT_KEY: &str = "dev_payment_key_change_in_production";
pub const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// HS256 signing secret for session tokens
    pub jwt_secret: SecretString,
    pub token_ttl: chrono::Duration,
    /// Key for card number / CVV obfuscation
    pub payment_key: SecretString,
    /// Upper bound on a single notification send
    pub notify_timeout: Duration,
    /// TOML catalog to seed products from
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables.
    ///
    /// In production the development secrets are refused.
    pub fn from_env() -> ShopResult<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080)?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET").unwrap_or_else(|_| DEV_JWT_SECRET.to_string()),
            ),
            token_ttl: chrono::Duration::hours(parse_var("JWT_TTL_HOURS", DEFAULT_TOKEN_TTL_HOURS)?),
            payment_key: SecretString::from(
                env::var("PAYMENT_KEY").unwrap_or_else(|_| DEV_PAYMENT_KEY.to_string()),
            ),
            notify_timeout: Duration::from_secs(parse_var(
                "NOTIFY_TIMEOUT_SECS",
                DEFAULT_NOTIFY_TIMEOUT_SECS,
            )?),
            catalog_path: env::var("PRODUCT_CATALOG").ok().map(PathBuf::from),
        };

        config.check_secrets()?;
        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> ShopResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ShopError::configuration(format!("Invalid bind address {}:{}", self.host, self.port)))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    fn check_secrets(&self) -> ShopResult<()> {
        if self.token_ttl <= chrono::Duration::zero() {
            return Err(ShopError::configuration("JWT_TTL_HOURS must be positive"));
        }
        if self.jwt_secret.expose_secret().is_empty() {
            return Err(ShopError::configuration("JWT_SECRET must not be empty"));
        }
        if self.payment_key.expose_secret().is_empty() {
            return Err(ShopError::configuration("PAYMENT_KEY must not be empty"));
        }
        if !self.is_production() {
            return Ok(());
        }
        if self.jwt_secret.expose_secret() == DEV_JWT_SECRET {
            return Err(ShopError::configuration("JWT_SECRET must be set in production"));
        }
        if self.payment_key.expose_secret() == DEV_PAYMENT_KEY {
            return Err(ShopError::configuration("PAYMENT_KEY must be set in production"));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    /// Development settings, independent of the environment
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            jwt_secret: SecretString::from(DEV_JWT_SECRET.to_string()),
            token_ttl: chrono::Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            payment_key: SecretString::from(DEV_PAYMENT_KEY.to_string()),
            notify_timeout: Duration::from_secs(DEFAULT_NOTIFY_TIMEOUT_SECS),
            catalog_path: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> ShopResult<T> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| ShopError::configuration(format!("{} is not valid: {}", name, raw))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            ..AppConfig::default()
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_bad_host_is_a_config_error() {
        let config = AppConfig {
            host: "not a host".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.socket_addr(), Err(ShopError::Configuration(_))));
    }

    #[test]
    fn test_dev_secrets_refused_in_production() {
        let config = AppConfig {
            environment: "production".to_string(),
            ..AppConfig::default()
        };
        assert!(config.check_secrets().is_err());

        let config = AppConfig {
            environment: "production".to_string(),
            jwt_secret: SecretString::from("a-real-secret".to_string()),
            payment_key: SecretString::from("a-real-key".to_string()),
            ..AppConfig::default()
        };
        assert!(config.check_secrets().is_ok());
    }

    #[test]
    fn test_dev_secrets_allowed_outside_production() {
        assert!(AppConfig::default().check_secrets().is_ok());
    }
}
