//! # Identity
//!
//! Signed session tokens (HS256 JWT) carrying the user's identity claims,
//! bearer-header parsing, and Argon2id password hashes.

use crate::error::{ShopError, ShopResult};
use crate::user::User;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Token failures. All of them surface to clients as 401.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Missing or invalid Authorization header")]
    MissingHeader,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        }
    }
}

impl From<TokenError> for ShopError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Encoding(detail) => ShopError::Infrastructure(detail),
            other => ShopError::Unauthenticated(other.to_string()),
        }
    }
}

/// Claims embedded in every session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn with_default_ttl(secret: &[u8]) -> Self {
        Self::new(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `user`
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            address: user.address.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Resolve a raw `Authorization` header value to a user id
    pub fn validate_header(&self, header: Option<&str>) -> ShopResult<i64> {
        let token = bearer_token(header).ok_or(TokenError::MissingHeader)?;
        Ok(self.verify(token)?.id)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Extract the token from `Bearer <token>`
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Hash a password with Argon2id into a PHC string
pub fn hash_password(password: &str) -> ShopResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ShopError::infrastructure(format!("password hash: {}", e)))
}

/// Check a password against a stored PHC string
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 42,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            address: Some("12 Analytical Row".into()),
            shipping_street: None,
            shipping_city: None,
            shipping_state: None,
            shipping_country: None,
            shipping_zip: None,
            shipping_phone: None,
            is_admin: false,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::with_default_ttl(b"test-secret");
        let token = issuer.issue(&user()).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.id, 42);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.address.as_deref(), Some("12 Analytical Row"));
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_validate_header() {
        let issuer = TokenIssuer::with_default_ttl(b"test-secret");
        let token = issuer.issue(&user()).unwrap();
        let header = format!("Bearer {}", token);

        assert_eq!(issuer.validate_header(Some(&header)).unwrap(), 42);
    }

    #[test]
    fn test_missing_or_malformed_header() {
        let issuer = TokenIssuer::with_default_ttl(b"test-secret");
        for header in [None, Some(""), Some("Bearer "), Some("Basic abc"), Some("bearer abc")] {
            let err = issuer.validate_header(header).unwrap_err();
            assert_eq!(err.status_code(), 401);
            assert_eq!(err.to_string(), "Missing or invalid Authorization header");
        }
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenIssuer::with_default_ttl(b"secret-one").issue(&user()).unwrap();
        let other = TokenIssuer::with_default_ttl(b"secret-two");
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = TokenIssuer::with_default_ttl(b"test-secret");
        let now = Utc::now().timestamp();
        let claims = Claims {
            id: 1,
            email: "old@example.com".into(),
            first_name: "Old".into(),
            last_name: "Token".into(),
            address: None,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = issuer.sign(&claims).unwrap();

        assert!(matches!(issuer.verify(&token), Err(TokenError::Expired)));
        let err: ShopError = TokenError::Expired.into();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let issuer = TokenIssuer::with_default_ttl(b"test-secret");
        let mut token = issuer.issue(&user()).unwrap();
        token.push('x');
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn test_password_hash() {
        let stored = hash_password("correct horse").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("wrong horse", &stored));
    }

    #[test]
    fn test_password_hash_rejects_malformed_stored_value() {
        assert!(!verify_password("correct horse", "garbage"));
        assert!(!verify_password("correct horse", "salt$0123abcd"));
    }

    #[test]
    fn test_password_hash_is_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }
}
