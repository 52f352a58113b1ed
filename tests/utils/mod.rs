pub mod actions;
pub mod assertions;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use actions::MultipartForm;
#[allow(unused_imports)]
pub use assertions::TestResponse;
pub use setup::{TestSetup, TestSetupBuilder};
