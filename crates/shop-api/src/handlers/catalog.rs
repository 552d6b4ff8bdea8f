//! Public product listing

use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use shop_core::{CatalogStore, Price, Product};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub price: Price,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            description: product.description,
            image_url: product.image_url,
        }
    }
}

/// All products, ordered by name
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<ProductView>>> {
    let products = state.store.list_products().await?;
    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}
