//! # Users and Accounts
//!
//! Account types plus the validation rules shared by registration, login
//! and profile updates.

use crate::auth::hash_password;
use crate::error::{ShopError, ShopResult};
use crate::updates::FieldUpdates;
use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 8;

/// A registered user (profile view, no credential)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: Option<String>,
    pub shipping_street: Option<String>,
    pub shipping_city: Option<String>,
    pub shipping_state: Option<String>,
    pub shipping_country: Option<String>,
    pub shipping_zip: Option<String>,
    pub shipping_phone: Option<String>,
    #[serde(skip_serializing)]
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A user row together with its stored password digest
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Registration input after validation
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub address: Option<String>,
}

/// Raw registration request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Registration {
    /// Validate fields in the order a client sees errors and hash the password
    pub fn validate(self) -> ShopResult<NewUser> {
        let email = normalize_email(self.email.as_deref().unwrap_or_default());
        validate_email(&email)?;
        let first_name = validate_name(self.first_name.as_deref(), "First name")?;
        let last_name = validate_name(self.last_name.as_deref(), "Last name")?;
        let password = self.password.unwrap_or_default();
        validate_password(&password)?;

        Ok(NewUser {
            first_name,
            last_name,
            email,
            password_hash: hash_password(&password)?,
            address: non_blank(self.address.as_deref()),
        })
    }
}

/// Raw login request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Login {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Login {
    /// Returns the normalized email and the password
    pub fn validate(self) -> ShopResult<(String, String)> {
        let email = normalize_email(self.email.as_deref().unwrap_or_default());
        validate_email(&email)?;
        let password = self.password.unwrap_or_default();
        validate_password(&password)?;
        Ok((email, password))
    }
}

/// Profile update. A field that is absent is left alone; a field that is
/// present (even `null`) is written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountUpdate {
    #[serde(default, deserialize_with = "present")]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub password: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub shipping_street: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub shipping_city: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub shipping_state: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub shipping_country: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub shipping_zip: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub shipping_phone: Option<Option<String>>,
}

impl AccountUpdate {
    /// Validate present fields and turn them into column assignments
    pub fn into_updates(self) -> ShopResult<FieldUpdates> {
        let mut updates = FieldUpdates::new();

        if let Some(first_name) = self.first_name {
            updates.text("first_name", validate_name(first_name.as_deref(), "First name")?);
        }
        if let Some(last_name) = self.last_name {
            updates.text("last_name", validate_name(last_name.as_deref(), "Last name")?);
        }
        if let Some(email) = self.email {
            let email = normalize_email(email.as_deref().unwrap_or_default());
            validate_email(&email)?;
            updates.text("email", email);
        }
        if let Some(address) = self.address {
            updates.optional_text("address", non_blank(address.as_deref()));
        }

        let shipping = [
            ("shipping_street", self.shipping_street),
            ("shipping_city", self.shipping_city),
            ("shipping_state", self.shipping_state),
            ("shipping_country", self.shipping_country),
            ("shipping_zip", self.shipping_zip),
            ("shipping_phone", self.shipping_phone),
        ];
        for (column, value) in shipping {
            if let Some(value) = value {
                updates.text(column, value.as_deref().unwrap_or_default().trim());
            }
        }

        if let Some(password) = self.password {
            let password = password.unwrap_or_default();
            validate_password(&password)?;
            updates.text("password_hash", hash_password(&password)?);
        }

        if updates.is_empty() {
            return Err(ShopError::validation("No fields to update"));
        }
        Ok(updates)
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Syntactic email check: one `@`, non-empty local part, dotted domain
pub fn validate_email(email: &str) -> ShopResult<()> {
    let invalid = || ShopError::validation("Invalid email");

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_name(raw: Option<&str>, label: &str) -> ShopResult<String> {
    let name = raw.unwrap_or_default().trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ShopError::validation(format!(
            "{} must be at least {} characters",
            label, MIN_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

pub fn validate_password(password: &str) -> ShopResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ShopError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
