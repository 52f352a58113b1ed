// Public API - what other modules can use
pub use handlers::{login, register};

// Internal modules
mod handlers;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod types;
mod validation;
