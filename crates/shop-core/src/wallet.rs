//! # Payment Method Service
//!
//! Owner-scoped CRUD over saved cards. Input is validated and obfuscated
//! before the store is called; a card that belongs to someone else is
//! reported exactly like a card that does not exist.

use crate::crypto::ObfuscationKey;
use crate::error::{ShopError, ShopResult};
use crate::payment_method::{
    DefaultPaymentMethod, MaskedPaymentMethod, PaymentMethodPatch, PaymentMethodRequest,
    PaymentMethodSummary,
};
use crate::store::SharedStore;
use tracing::{info, instrument};

const NOT_FOUND: &str = "Payment method not found";
const NO_DEFAULT: &str = "No default payment method set";

#[derive(Clone)]
pub struct PaymentMethodService {
    store: SharedStore,
    key: ObfuscationKey,
}

impl PaymentMethodService {
    pub fn new(store: SharedStore, key: ObfuscationKey) -> Self {
        Self { store, key }
    }

    pub async fn list(&self, user_id: i64) -> ShopResult<Vec<PaymentMethodSummary>> {
        let methods = self.store.list_payment_methods(user_id).await?;
        Ok(methods.iter().map(|m| m.summary()).collect())
    }

    pub async fn get(&self, user_id: i64, id: i64) -> ShopResult<MaskedPaymentMethod> {
        let method = self
            .store
            .find_payment_method(user_id, id)
            .await?
            .ok_or_else(|| ShopError::not_found(NOT_FOUND))?;
        Ok(method.masked(&self.key))
    }

    pub async fn default_method(&self, user_id: i64) -> ShopResult<DefaultPaymentMethod> {
        let method = self
            .store
            .default_payment_method(user_id)
            .await?
            .ok_or_else(|| ShopError::not_found(NO_DEFAULT))?;
        Ok(method.default_view())
    }

    /// Returns the new id
    #[instrument(skip(self, request))]
    pub async fn create(&self, user_id: i64, request: PaymentMethodRequest) -> ShopResult<i64> {
        let method = request.validate(&self.key)?;
        let is_default = method.is_default;
        let id = self.store.insert_payment_method(user_id, method).await?;

        info!(payment_method_id = id, is_default, "Payment method added");
        Ok(id)
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, user_id: i64, id: i64, patch: PaymentMethodPatch) -> ShopResult<()> {
        let updates = patch.into_updates(&self.key)?;
        if !self.store.update_payment_method(user_id, id, &updates).await? {
            return Err(ShopError::not_found(NOT_FOUND));
        }

        info!(payment_method_id = id, columns = ?updates.columns(), "Payment method updated");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: i64, id: i64) -> ShopResult<()> {
        if !self.store.delete_payment_method(user_id, id).await? {
            return Err(ShopError::not_found(NOT_FOUND));
        }
        info!(payment_method_id = id, "Payment method deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_default(&self, user_id: i64, id: i64) -> ShopResult<()> {
        if !self.store.set_default_payment_method(user_id, id).await? {
            return Err(ShopError::not_found(NOT_FOUND));
        }
        info!(payment_method_id = id, "Default payment method changed");
        Ok(())
    }
}

impl std::fmt::Debug for PaymentMethodService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentMethodService")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
