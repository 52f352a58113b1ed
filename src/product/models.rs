use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Database model for the products table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct ProductModel {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub image: Option<String>, // Stored path of the uploaded image
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A product ready to be inserted
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: i64,
    pub image: Option<String>,
    pub user_id: i64,
}

/// Partial update; every field is independently present or absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub user_id: Option<i64>,
    pub image: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overwrites exactly the fields that are present
    pub fn apply(self, product: &mut ProductModel) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(user_id) = self.user_id {
            product.user_id = user_id;
        }
        if let Some(image) = self.image {
            product.image = Some(image);
        }
    }
}
