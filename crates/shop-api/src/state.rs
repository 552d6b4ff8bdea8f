//! # Application State
//!
//! Shared state for the Axum application: the store, the token issuer,
//! the order workflow and the payment-method service. Built once at
//! startup and cloned into every request.

use crate::config::AppConfig;
use secrecy::ExposeSecret;
use shop_core::{
    BoxedNotifier, CatalogStore, ObfuscationKey, OrderWorkflow, PaymentMethodService, ProductCatalog, SharedStore,
    ShopError, ShopResult, TokenIssuer,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub tokens: TokenIssuer,
    pub orders: OrderWorkflow,
    pub wallet: PaymentMethodService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, store: SharedStore, notifier: BoxedNotifier) -> ShopResult<Self> {
        let tokens = TokenIssuer::new(config.jwt_secret.expose_secret().as_bytes(), config.token_ttl);
        let key = ObfuscationKey::new(config.payment_key.expose_secret())
            .map_err(|e| ShopError::configuration(e.to_string()))?;

        let orders = OrderWorkflow::new(store.clone(), notifier).with_notify_timeout(config.notify_timeout);
        let wallet = PaymentMethodService::new(store.clone(), key);

        Ok(Self {
            store,
            tokens,
            orders,
            wallet,
            config: Arc::new(config),
        })
    }

    /// Order tracking page linked from status emails
    pub fn with_tracking_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.orders = self.orders.with_tracking_url(url);
        }
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("orders", &self.orders)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Load the product catalog from `path`, or from `config/products.toml`
/// searched upwards from the working directory.
pub fn load_product_catalog(path: Option<&Path>) -> anyhow::Result<ProductCatalog> {
    let candidates: Vec<PathBuf> = match path {
        Some(path) => vec![path.to_path_buf()],
        None => ["config/products.toml", "../config/products.toml", "../../config/products.toml"]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
    };

    for candidate in &candidates {
        if let Ok(content) = std::fs::read_to_string(candidate) {
            let catalog = ProductCatalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", candidate.display(), e))?;
            info!("Loaded {} products from {}", catalog.len(), candidate.display());
            return Ok(catalog);
        }
    }

    if let Some(path) = path {
        anyhow::bail!("Product catalog not found: {}", path.display());
    }

    warn!("No product catalog found, skipping seed");
    Ok(ProductCatalog::new())
}

/// Upsert every catalog entry by name
pub async fn seed_catalog(store: &SharedStore, catalog: &ProductCatalog) -> ShopResult<usize> {
    for entry in &catalog.products {
        store.upsert_product(entry).await?;
    }
    Ok(catalog.len())
}
