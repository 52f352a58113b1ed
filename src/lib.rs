// Library crate for the storefront API server
// The binary and the integration tests both build on this

pub mod app;
pub mod config;
pub mod database;
pub mod product;
pub mod session;
pub mod shared;
pub mod storage;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use config::AppConfig;
pub use shared::{AppError, AppState};
