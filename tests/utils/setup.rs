use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;

use storefront::{
    build_router,
    product::repository::InMemoryProductRepository,
    session::{service::SessionService, token::TokenConfig},
    storage::ImageStore,
    user::repository::InMemoryUserRepository,
    AppState,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub const TEST_SECRET: &str = "integration-secret-long-enough-for-hs256";

pub struct TestSetup {
    pub app: Router,
    pub state: AppState,
    pub upload_dir: PathBuf,
}

impl Drop for TestSetup {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

pub struct TestSetupBuilder {
    max_upload_bytes: usize,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }

    #[allow(dead_code)] // Only the upload limit flow sets this
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn build(self) -> TestSetup {
        let upload_dir =
            std::env::temp_dir().join(format!("storefront-it-{}", uuid::Uuid::new_v4()));

        let state = AppState::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryProductRepository::new()),
            Arc::new(SessionService::new(TokenConfig::new(
                TEST_SECRET,
                chrono::Duration::hours(24),
            ))),
            Arc::new(ImageStore::new(upload_dir.clone())),
        );

        TestSetup {
            app: build_router(state.clone(), self.max_upload_bytes),
            state,
            upload_dir,
        }
    }
}
