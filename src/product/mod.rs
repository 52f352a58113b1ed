// Public API - what other modules can use
pub use handlers::{create_product, delete_product, get_product, list_products, update_product};

// Internal modules
pub mod form;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
