use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::models::{NewProduct, ProductModel};
use crate::shared::AppError;

/// Trait for product repository operations
#[async_trait]
pub trait ProductRepository {
    /// All products ordered by id
    async fn list_products(&self) -> Result<Vec<ProductModel>, AppError>;
    async fn get_product(&self, id: i64) -> Result<Option<ProductModel>, AppError>;
    async fn create_product(&self, product: &NewProduct) -> Result<ProductModel, AppError>;
    /// Persists every column of `product` and bumps `updated_at`
    async fn update_product(&self, product: &ProductModel) -> Result<ProductModel, AppError>;
    async fn delete_product(&self, id: i64) -> Result<(), AppError>;
}

#[derive(Default)]
struct ProductTable {
    next_id: i64,
    rows: BTreeMap<i64, ProductModel>,
}

/// In-memory implementation of ProductRepository for development and testing
#[derive(Default)]
pub struct InMemoryProductRepository {
    products: RwLock<ProductTable>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<ProductModel>, AppError> {
        let table = self.products.read().await;
        debug!(count = table.rows.len(), "Listing products from memory");
        Ok(table.rows.values().cloned().collect())
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: i64) -> Result<Option<ProductModel>, AppError> {
        let product = self.products.read().await.rows.get(&id).cloned();
        debug!(found = product.is_some(), "Fetched product from memory");
        Ok(product)
    }

    #[instrument(skip(self, product), fields(user_id = product.user_id))]
    async fn create_product(&self, product: &NewProduct) -> Result<ProductModel, AppError> {
        let mut table = self.products.write().await;
        table.next_id += 1;

        let now = Utc::now();
        let model = ProductModel {
            id: table.next_id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            user_id: product.user_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(model.id, model.clone());

        debug!(product_id = model.id, "Product created in memory");
        Ok(model)
    }

    #[instrument(skip(self, product), fields(product_id = product.id))]
    async fn update_product(&self, product: &ProductModel) -> Result<ProductModel, AppError> {
        let mut table = self.products.write().await;
        let Some(existing) = table.rows.get_mut(&product.id) else {
            warn!("Product not found for update in memory");
            return Err(AppError::NotFound("Product not found".to_string()));
        };

        *existing = ProductModel {
            created_at: existing.created_at,
            updated_at: Utc::now(),
            ..product.clone()
        };

        debug!("Product updated in memory");
        Ok(existing.clone())
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        if self.products.write().await.rows.remove(&id).is_none() {
            warn!("Product not found for deletion in memory");
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        debug!("Product deleted from memory");
        Ok(())
    }
}

/// PostgreSQL implementation of product repository
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, price, image, user_id, created_at, updated_at";

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<ProductModel>, AppError> {
        sqlx::query_as::<_, ProductModel>(&format!(
            "SELECT {} FROM products ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list products");
            AppError::from(e)
        })
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: i64) -> Result<Option<ProductModel>, AppError> {
        sqlx::query_as::<_, ProductModel>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to fetch product");
            AppError::from(e)
        })
    }

    #[instrument(skip(self, product), fields(user_id = product.user_id))]
    async fn create_product(&self, product: &NewProduct) -> Result<ProductModel, AppError> {
        let model = sqlx::query_as::<_, ProductModel>(&format!(
            "INSERT INTO products (name, price, image, user_id) VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.image)
        .bind(product.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create product");
            AppError::from(e)
        })?;

        debug!(product_id = model.id, "Product created in database");
        Ok(model)
    }

    #[instrument(skip(self, product), fields(product_id = product.id))]
    async fn update_product(&self, product: &ProductModel) -> Result<ProductModel, AppError> {
        let updated = sqlx::query_as::<_, ProductModel>(&format!(
            "UPDATE products SET name = $2, price = $3, image = $4, user_id = $5, \
             updated_at = NOW() WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.image)
        .bind(product.user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to update product");
            AppError::from(e)
        })?;

        updated.ok_or_else(|| {
            warn!("Product not found for update");
            AppError::NotFound("Product not found".to_string())
        })
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to delete product");
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            warn!("Product not found for deletion");
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        debug!("Product deleted from database");
        Ok(())
    }
}
