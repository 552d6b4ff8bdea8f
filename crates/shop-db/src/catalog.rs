//! Product queries

use crate::{db_error, PgStore};
use async_trait::async_trait;
use shop_core::{CatalogEntry, CatalogStore, Price, Product, ShopResult};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price_cents: i64,
    description: Option<String>,
    image_url: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            price: Price::from_cents(row.price_cents),
            description: row.description,
            image_url: row.image_url,
        }
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_products(&self) -> ShopResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, name, price_cents, description, image_url FROM products ORDER BY name",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| db_error("list_products", e))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_product(&self, product_id: i64) -> ShopResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(
            "SELECT id, name, price_cents, description, image_url FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| db_error("find_product", e))?;

        Ok(row.map(Product::from))
    }

    async fn upsert_product(&self, entry: &CatalogEntry) -> ShopResult<Product> {
        let row: ProductRow = sqlx::query_as(
            "INSERT INTO products (name, price_cents, description, image_url) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (name) DO UPDATE SET \
                price_cents = EXCLUDED.price_cents, \
                description = EXCLUDED.description, \
                image_url = EXCLUDED.image_url \
             RETURNING id, name, price_cents, description, image_url",
        )
        .bind(&entry.name)
        .bind(entry.price().cents())
        .bind(&entry.description)
        .bind(&entry.image_url)
        .fetch_one(self.pool())
        .await
        .map_err(|e| db_error("upsert_product", e))?;

        Ok(row.into())
    }
}
