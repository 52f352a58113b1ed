use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    form::{parse_product_id, ProductForm},
    service::ProductService,
    types::{
        ProductDeletedResponse, ProductDetailResponse, ProductListResponse,
        ProductMutationResponse,
    },
};
use crate::shared::{AppError, AppState};

fn service(state: &AppState) -> ProductService {
    ProductService::new(
        Arc::clone(&state.product_repository),
        Arc::clone(&state.user_repository),
        Arc::clone(&state.image_store),
    )
}

async fn read_form(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ProductForm, AppError> {
    let multipart = multipart.map_err(|e| AppError::Validation(e.body_text()))?;
    ProductForm::from_multipart(multipart).await
}

/// GET /products
#[instrument(name = "list_products", skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductListResponse>, AppError> {
    let products = service(&state).list_products().await?;
    Ok(Json(ProductListResponse { products }))
}

/// GET /products/:id
#[instrument(name = "get_product", skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDetailResponse>, AppError> {
    let id = parse_product_id(&id)?;
    let product = service(&state).get_product(id).await?;
    Ok(Json(ProductDetailResponse { product }))
}

/// POST /products
///
/// Multipart form with `name`, `price`, `user_id` and an optional `image` file
#[instrument(name = "create_product", skip(state, multipart))]
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProductMutationResponse>, AppError> {
    let form = read_form(multipart).await?;
    let product = service(&state).create_product(form).await?;

    info!(product_id = product.id, "Product created via API");

    Ok(Json(ProductMutationResponse {
        message: "Product created successfully".to_string(),
        product,
    }))
}

/// PUT /products/:id
///
/// Only the parts present in the form are changed
#[instrument(name = "update_product", skip(state, multipart))]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProductMutationResponse>, AppError> {
    let id = parse_product_id(&id)?;
    let form = read_form(multipart).await?;
    let product = service(&state).update_product(id, form).await?;

    Ok(Json(ProductMutationResponse {
        message: "Product updated successfully".to_string(),
        product,
    }))
}

/// DELETE /products/:id
#[instrument(name = "delete_product", skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductDeletedResponse>, AppError> {
    let id = parse_product_id(&id)?;
    service(&state).delete_product(id).await?;

    Ok(Json(ProductDeletedResponse {
        message: "Product deleted successfully".to_string(),
        product_id: id,
    }))
}
