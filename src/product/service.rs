use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use super::{
    form::{ProductForm, UploadedImage},
    models::{NewProduct, ProductModel},
    repository::ProductRepository,
    types::ProductResponse,
};
use crate::shared::AppError;
use crate::storage::ImageStore;
use crate::user::{models::UserModel, repository::UserRepository};

/// Service for product business logic
pub struct ProductService {
    products: Arc<dyn ProductRepository + Send + Sync>,
    users: Arc<dyn UserRepository + Send + Sync>,
    images: Arc<ImageStore>,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository + Send + Sync>,
        users: Arc<dyn UserRepository + Send + Sync>,
        images: Arc<ImageStore>,
    ) -> Self {
        Self {
            products,
            users,
            images,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductResponse>, AppError> {
        let products = self.products.list_products().await?;

        let mut owners: HashMap<i64, UserModel> = HashMap::new();
        let mut responses = Vec::with_capacity(products.len());
        for product in products {
            if !owners.contains_key(&product.user_id) {
                let owner = self.owner_of(&product).await?;
                owners.insert(owner.id, owner);
            }
            let owner = &owners[&product.user_id];
            responses.push(ProductResponse::new(product, owner));
        }

        info!(count = responses.len(), "Products listed");
        Ok(responses)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i64) -> Result<ProductResponse, AppError> {
        let product = self.load(id).await?;
        self.respond(product).await
    }

    #[instrument(skip(self, form))]
    pub async fn create_product(&self, form: ProductForm) -> Result<ProductResponse, AppError> {
        let fields = form.required_fields()?;
        self.ensure_user_exists(fields.user_id).await?;

        let image = match &form.image {
            Some(upload) => Some(self.store_image(upload).await?),
            None => None,
        };

        let new_product = NewProduct {
            name: fields.name,
            price: fields.price,
            image: image.clone(),
            user_id: fields.user_id,
        };

        let product = match self.products.create_product(&new_product).await {
            Ok(product) => product,
            Err(e) => {
                if let Some(path) = image {
                    self.discard_image(&path).await;
                }
                return Err(e);
            }
        };

        info!(product_id = product.id, "Product created");
        self.respond(product).await
    }

    /// Applies the fields present in `form` to an existing product
    #[instrument(skip(self, form))]
    pub async fn update_product(
        &self,
        id: i64,
        form: ProductForm,
    ) -> Result<ProductResponse, AppError> {
        let mut product = self.load(id).await?;

        let mut patch = form.patch()?;
        if let Some(user_id) = patch.user_id {
            self.ensure_user_exists(user_id).await?;
        }

        let old_image = product.image.clone();
        let new_image = match &form.image {
            Some(upload) => Some(self.store_image(upload).await?),
            None => None,
        };
        patch.image = new_image.clone();
        patch.apply(&mut product);

        // The row must point at the new file before the old one goes away
        let product = match self.products.update_product(&product).await {
            Ok(product) => product,
            Err(e) => {
                if let Some(path) = &new_image {
                    self.discard_image(path).await;
                }
                return Err(e);
            }
        };

        if let (Some(_), Some(old_path)) = (&new_image, &old_image) {
            if let Err(e) = self.images.delete(old_path).await {
                error!(error = %e, path = %old_path, "Failed to delete old image");
                return Err(AppError::Internal("Failed to delete old image".to_string()));
            }
        }

        info!(product_id = product.id, "Product updated");
        self.respond(product).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> Result<(), AppError> {
        let product = self.load(id).await?;

        if let Some(path) = &product.image {
            self.images.delete(path).await.map_err(|e| {
                error!(error = %e, path = %path, "Failed to delete product image");
                AppError::Internal("Failed to delete product image".to_string())
            })?;
        }

        self.products.delete_product(id).await?;

        info!(product_id = id, "Product deleted");
        Ok(())
    }

    async fn load(&self, id: i64) -> Result<ProductModel, AppError> {
        self.products
            .get_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
    }

    async fn respond(&self, product: ProductModel) -> Result<ProductResponse, AppError> {
        let owner = self.owner_of(&product).await?;
        Ok(ProductResponse::new(product, &owner))
    }

    async fn owner_of(&self, product: &ProductModel) -> Result<UserModel, AppError> {
        self.users.find_by_id(product.user_id).await?.ok_or_else(|| {
            error!(
                product_id = product.id,
                user_id = product.user_id,
                "Product references a missing user"
            );
            AppError::Internal("Product owner not found".to_string())
        })
    }

    async fn ensure_user_exists(&self, user_id: i64) -> Result<(), AppError> {
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => {
                warn!(user_id, "Product refers to unknown user");
                Err(AppError::Validation("User not found".to_string()))
            }
        }
    }

    async fn store_image(&self, upload: &UploadedImage) -> Result<String, AppError> {
        self.images
            .save(&upload.file_name, &upload.bytes)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to store uploaded image");
                AppError::Internal("Failed to upload image".to_string())
            })
    }

    /// Best-effort removal of an image that never made it into the database
    async fn discard_image(&self, path: &str) {
        if let Err(e) = self.images.delete(path).await {
            warn!(error = %e, path = %path, "Failed to discard orphaned image");
        }
    }
}
