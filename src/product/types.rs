use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::ProductModel;
use crate::user::models::UserModel;

/// Owner summary embedded in product responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserMinimal {
    pub id: i64,
    pub username: String,
}

/// Public view of a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub image: Option<String>,
    pub user: UserMinimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    pub fn new(product: ProductModel, owner: &UserModel) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            user: UserMinimal {
                id: owner.id,
                username: owner.username.clone(),
            },
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductDetailResponse {
    pub product: ProductResponse,
}

/// Response for create and update
#[derive(Debug, Serialize, Deserialize)]
pub struct ProductMutationResponse {
    pub message: String,
    pub product: ProductResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductDeletedResponse {
    pub message: String,
    pub product_id: i64,
}
