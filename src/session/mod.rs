// Public API - what other modules can use
pub use cleanup_task::{start_cleanup_task, CleanupConfig};
pub use handlers::logout;
pub use middleware::jwt_auth;
pub use types::{LoginResponse, SessionClaims, SessionToken};

// Internal modules
pub mod blacklist;
mod cleanup_task;
mod handlers;
mod middleware;
pub mod service;
pub mod token;
mod types;
