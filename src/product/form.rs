use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
};
use tracing::debug;

use super::models::ProductPatch;
use crate::shared::AppError;

/// A file part from a multipart request
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Raw product form as received. Values stay strings until the caller knows
/// whether it is creating (required fields) or patching (optional fields).
#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<String>,
    pub user_id: Option<String>,
    pub image: Option<UploadedImage>,
}

/// Validated scalar fields of a product being created
#[derive(Debug, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub price: i64,
    pub user_id: i64,
}

impl ProductForm {
    /// Reads all parts of a multipart body. Unknown parts are ignored.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ProductForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let Some(part) = field.name().map(str::to_string) else {
                continue;
            };

            match part.as_str() {
                "image" => {
                    // Only a real file part counts as an upload
                    let file_name = field.file_name().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(multipart_error)?;
                    if let Some(file_name) = file_name.filter(|name| !name.is_empty()) {
                        form.image = Some(UploadedImage {
                            file_name,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                "name" | "price" | "user_id" => {
                    let value = field
                        .text()
                        .await
                        .map_err(multipart_error)?;
                    match part.as_str() {
                        "name" => form.name = Some(value),
                        "price" => form.price = Some(value),
                        _ => form.user_id = Some(value),
                    }
                }
                other => debug!(part = %other, "Ignoring unknown form part"),
            }
        }

        Ok(form)
    }

    /// Fields for a new product: price and user_id are required
    pub fn required_fields(&self) -> Result<ProductFields, AppError> {
        let price = non_empty(&self.price)
            .ok_or_else(|| AppError::Validation("Price is required".to_string()))?;
        let price = parse_price(price)?;

        let user_id = non_empty(&self.user_id)
            .ok_or_else(|| AppError::Validation("User ID is required".to_string()))?;
        let user_id = parse_user_id(user_id)?;

        Ok(ProductFields {
            name: self.name.clone().unwrap_or_default(),
            price,
            user_id,
        })
    }

    /// Patch for an existing product: empty values count as absent.
    /// The image is handled separately because it must be stored first.
    pub fn patch(&self) -> Result<ProductPatch, AppError> {
        Ok(ProductPatch {
            name: non_empty(&self.name).map(str::to_string),
            price: non_empty(&self.price).map(parse_price).transpose()?,
            user_id: non_empty(&self.user_id).map(parse_user_id).transpose()?,
            image: None,
        })
    }
}

/// Over-limit bodies keep their 413; every other malformed part is a 400
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_price(value: &str) -> Result<i64, AppError> {
    value
        .parse()
        .map_err(|_| AppError::Validation("Invalid price format".to_string()))
}

fn parse_user_id(value: &str) -> Result<i64, AppError> {
    value
        .parse()
        .map_err(|_| AppError::Validation("Invalid User ID".to_string()))
}

/// Path ids arrive as strings so a bad one gets our own error message
pub fn parse_product_id(raw: &str) -> Result<i64, AppError> {
    raw.parse()
        .map_err(|_| AppError::Validation("Invalid product ID".to_string()))
}
