//! # Card Field Obfuscation
//!
//! Reversible XOR obfuscation of stored card fields, base64-encoded for
//! storage in text columns.
//!
//! **This is not encryption.** There is no authentication tag, no nonce and
//! no key derivation; anyone holding one plaintext/token pair recovers the
//! key. It stands in for a vault or tokenization service and must be
//! replaced by an authenticated cipher (or by delegating card storage to the
//! payment provider) before real card data goes anywhere near it.

use base64::{engine::general_purpose::STANDARD, Engine};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Failure to turn a stored token back into text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RevealError {
    #[error("token is not valid base64")]
    InvalidEncoding,

    #[error("token is empty")]
    Empty,

    #[error("revealed bytes are not UTF-8")]
    InvalidUtf8,
}

/// Error building a key
#[derive(Debug, Error, PartialEq, Eq)]
#[error("obfuscation key must not be empty")]
pub struct EmptyKeyError;

/// Shared secret used to obfuscate card fields
#[derive(Clone)]
pub struct ObfuscationKey(SecretString);

impl ObfuscationKey {
    pub fn new(key: impl Into<String>) -> Result<Self, EmptyKeyError> {
        let key = key.into();
        if key.is_empty() {
            return Err(EmptyKeyError);
        }
        Ok(Self(SecretString::from(key)))
    }

    fn bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }

    /// XOR `plaintext` against the repeating key and base64-encode the result
    pub fn obfuscate(&self, plaintext: &str) -> String {
        STANDARD.encode(xor(plaintext.as_bytes(), self.bytes()))
    }

    /// Reverse [`obfuscate`](Self::obfuscate)
    pub fn reveal(&self, token: &str) -> Result<String, RevealError> {
        let raw = STANDARD
            .decode(token.trim())
            .map_err(|_| RevealError::InvalidEncoding)?;
        if raw.is_empty() {
            return Err(RevealError::Empty);
        }
        String::from_utf8(xor(&raw, self.bytes())).map_err(|_| RevealError::InvalidUtf8)
    }
}

impl std::fmt::Debug for ObfuscationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ObfuscationKey").field(&"[REDACTED]").finish()
    }
}

fn xor(data: &[u8], key: &[u8]) -> Vec<u8> {
    data.iter()
        .zip(key.iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ObfuscationKey {
        ObfuscationKey::new("dev_payment_key_change_in_production").unwrap()
    }

    #[test]
    fn test_round_trip() {
        let key = key();
        for plaintext in ["4111111111111111", "123", "Zoë – ünïcode", "x"] {
            let token = key.obfuscate(plaintext);
            assert_ne!(token, plaintext);
            assert_eq!(key.reveal(&token).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_key_shorter_than_data_repeats() {
        let key = ObfuscationKey::new("k").unwrap();
        let token = key.obfuscate("5500000000000004");
        assert_eq!(key.reveal(&token).unwrap(), "5500000000000004");
    }

    #[test]
    fn test_known_vector() {
        // 'A' (0x41) ^ 'k' (0x6b) = 0x2a => "Kg=="
        let key = ObfuscationKey::new("k").unwrap();
        assert_eq!(key.obfuscate("A"), "Kg==");
    }

    #[test]
    fn test_reveal_rejects_bad_encoding() {
        assert_eq!(key().reveal("not base64!!"), Err(RevealError::InvalidEncoding));
    }

    #[test]
    fn test_reveal_rejects_empty_token() {
        assert_eq!(key().reveal(""), Err(RevealError::Empty));
    }

    #[test]
    fn test_reveal_with_wrong_key_does_not_round_trip() {
        let token = key().obfuscate("4111111111111111");
        let other = ObfuscationKey::new("another key").unwrap();
        assert_ne!(other.reveal(&token).ok().as_deref(), Some("4111111111111111"));
    }

    #[test]
    fn test_empty_key_rejected() {
        assert_eq!(ObfuscationKey::new("").unwrap_err(), EmptyKeyError);
    }

    #[test]
    fn test_debug_redacts_key() {
        assert!(!format!("{:?}", key()).contains("dev_payment"));
    }
}
