//! # Payment Method Types
//!
//! Saved cards. Card number and CVV are stored obfuscated (see
//! [`crate::crypto`]); the last four digits are kept in clear for display.
//! Wire types use camelCase field names.

use crate::crypto::ObfuscationKey;
use crate::error::{ShopError, ShopResult};
use crate::updates::FieldUpdates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MASK_CHAR: char = '*';
pub const FALLBACK_MASK: &str = "**** **** **** ";
pub const MIN_CARD_DIGITS: usize = 13;
pub const MAX_CARD_DIGITS: usize = 19;

/// A stored payment method row
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethod {
    pub id: i64,
    pub user_id: i64,
    pub card_type: String,
    pub cardholder_name: String,
    /// Obfuscated card number
    pub card_number: String,
    pub last_four_digits: String,
    /// Obfuscated CVV
    pub cvv: String,
    pub expiry_date: String,
    pub billing_zip: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl PaymentMethod {
    pub fn summary(&self) -> PaymentMethodSummary {
        PaymentMethodSummary {
            id: self.id,
            card_type: self.card_type.clone(),
            cardholder_name: self.cardholder_name.clone(),
            last_four_digits: self.last_four_digits.clone(),
            expiry_date: self.expiry_date.clone(),
            billing_zip: self.billing_zip.clone(),
            is_default: self.is_default,
            created_at: self.created_at,
        }
    }

    /// Single-item view with the card number masked down to its last four
    pub fn masked(&self, key: &ObfuscationKey) -> MaskedPaymentMethod {
        let card_number = match key.reveal(&self.card_number) {
            Ok(revealed) if revealed.chars().count() >= 4 => mask_card_number(&revealed),
            Ok(_) => fallback_mask(&self.last_four_digits),
            Err(e) => {
                tracing::warn!(payment_method_id = self.id, error = %e, "Cannot reveal card number");
                fallback_mask(&self.last_four_digits)
            }
        };

        MaskedPaymentMethod {
            id: self.id,
            card_type: self.card_type.clone(),
            cardholder_name: self.cardholder_name.clone(),
            card_number,
            expiry_date: self.expiry_date.clone(),
            billing_zip: self.billing_zip.clone(),
            is_default: self.is_default,
        }
    }

    pub fn default_view(&self) -> DefaultPaymentMethod {
        DefaultPaymentMethod {
            id: self.id,
            card_type: self.card_type.clone(),
            cardholder_name: self.cardholder_name.clone(),
            last_four_digits: self.last_four_digits.clone(),
            expiry_date: self.expiry_date.clone(),
        }
    }
}

/// List view. Never carries the card number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodSummary {
    pub id: i64,
    pub card_type: String,
    pub cardholder_name: String,
    pub last_four_digits: String,
    pub expiry_date: String,
    pub billing_zip: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedPaymentMethod {
    pub id: i64,
    pub card_type: String,
    pub cardholder_name: String,
    pub card_number: String,
    pub expiry_date: String,
    pub billing_zip: String,
    pub is_default: bool,
}

/// Checkout autofill view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultPaymentMethod {
    pub id: i64,
    pub card_type: String,
    pub cardholder_name: String,
    pub last_four_digits: String,
    pub expiry_date: String,
}

/// Validated, obfuscated input for a new payment method
#[derive(Debug, Clone)]
pub struct NewPaymentMethod {
    pub card_type: String,
    pub cardholder_name: String,
    pub card_number: String,
    pub last_four_digits: String,
    pub cvv: String,
    pub expiry_date: String,
    pub billing_zip: String,
    pub is_default: bool,
}

/// Create request as sent by clients
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodRequest {
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub cardholder_name: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub cvv: Option<String>,
    #[serde(default)]
    pub billing_zip: Option<String>,
    #[serde(default)]
    pub is_default: Option<bool>,
}

impl PaymentMethodRequest {
    /// Check required fields, normalize the card number and obfuscate secrets
    pub fn validate(self, key: &ObfuscationKey) -> ShopResult<NewPaymentMethod> {
        let required = [
            ("cardType", &self.card_type),
            ("cardholderName", &self.cardholder_name),
            ("cardNumber", &self.card_number),
            ("expiryDate", &self.expiry_date),
            ("cvv", &self.cvv),
            ("billingZip", &self.billing_zip),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ShopError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let card_number = normalize_card_number(self.card_number.as_deref().unwrap_or_default())?;
        let last_four_digits = last_four(&card_number);

        Ok(NewPaymentMethod {
            card_type: self.card_type.unwrap_or_default(),
            cardholder_name: self.cardholder_name.unwrap_or_default(),
            card_number: key.obfuscate(&card_number),
            last_four_digits,
            cvv: key.obfuscate(self.cvv.as_deref().unwrap_or_default()),
            expiry_date: self.expiry_date.unwrap_or_default(),
            billing_zip: self.billing_zip.unwrap_or_default(),
            is_default: self.is_default.unwrap_or(false),
        })
    }
}

/// Partial update request. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodPatch {
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub cardholder_name: Option<String>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub cvv: Option<String>,
    #[serde(default)]
    pub billing_zip: Option<String>,
    #[serde(default)]
    pub is_default: Option<bool>,
}

impl PaymentMethodPatch {
    /// Column assignments for this patch.
    ///
    /// A card number containing [`MASK_CHAR`] is the masked display value
    /// sent back unchanged and is skipped.
    pub fn into_updates(self, key: &ObfuscationKey) -> ShopResult<FieldUpdates> {
        let mut updates = FieldUpdates::new();

        if let Some(card_type) = self.card_type {
            updates.text("card_type", card_type);
        }
        if let Some(name) = self.cardholder_name {
            updates.text("cardholder_name", name);
        }
        if let Some(raw) = self.card_number.filter(|n| !n.contains(MASK_CHAR)) {
            let card_number = normalize_card_number(&raw)?;
            updates
                .text("card_number", key.obfuscate(&card_number))
                .text("last_four_digits", last_four(&card_number));
        }
        if let Some(expiry) = self.expiry_date {
            updates.text("expiry_date", expiry);
        }
        if let Some(cvv) = self.cvv {
            updates.text("cvv", key.obfuscate(&cvv));
        }
        if let Some(zip) = self.billing_zip {
            updates.text("billing_zip", zip);
        }
        if let Some(is_default) = self.is_default {
            updates.flag("is_default", is_default);
        }

        if updates.is_empty() {
            return Err(ShopError::validation("No fields to update"));
        }
        Ok(updates)
    }
}

/// Strip spaces and hyphens; require 13–19 ASCII digits
pub fn normalize_card_number(raw: &str) -> ShopResult<String> {
    let digits: String = raw.chars().filter(|c| *c != ' ' && *c != '-').collect();
    let valid = (MIN_CARD_DIGITS..=MAX_CARD_DIGITS).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit());
    if !valid {
        return Err(ShopError::validation("Invalid card number"));
    }
    Ok(digits)
}

fn last_four(card_number: &str) -> String {
    let skip = card_number.chars().count().saturating_sub(4);
    card_number.chars().skip(skip).collect()
}

/// Mask all but the last four characters and group into blocks of four,
/// e.g. `"4111111111111111"` → `"**** **** **** 1111"`
pub fn mask_card_number(revealed: &str) -> String {
    let chars: Vec<char> = revealed.chars().collect();
    let visible_from = chars.len().saturating_sub(4);
    let masked: Vec<char> = chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < visible_from { MASK_CHAR } else { *c })
        .collect();

    masked
        .chunks(4)
        .map(|block| block.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

fn fallback_mask(last_four_digits: &str) -> String {
    format!("{}{}", FALLBACK_MASK, last_four_digits)
}
