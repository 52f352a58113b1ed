use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront::{
    build_router, database,
    product::repository::{InMemoryProductRepository, PostgresProductRepository},
    session::{service::SessionService, start_cleanup_task, token::TokenConfig, CleanupConfig},
    storage::ImageStore,
    user::repository::{InMemoryUserRepository, PostgresUserRepository},
    AppConfig, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting storefront server");

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let session_service = Arc::new(SessionService::new(TokenConfig::new(
        config.jwt_secret.clone(),
        config.token_ttl(),
    )));
    let image_store = Arc::new(ImageStore::new(config.upload_dir.clone()));
    tokio::fs::create_dir_all(image_store.upload_dir())
        .await
        .with_context(|| format!("Failed to create {}", config.upload_dir.display()))?;

    // Swap implementations depending on whether a database is configured
    let app_state = match &config.database_url {
        Some(url) => {
            let pool = database::connect(url)
                .await
                .context("Failed to connect to database")?;
            database::ensure_schema(&pool)
                .await
                .context("Failed to prepare database schema")?;

            AppState::new(
                Arc::new(PostgresUserRepository::new(pool.clone())),
                Arc::new(PostgresProductRepository::new(pool)),
                Arc::clone(&session_service),
                image_store,
            )
        }
        None => {
            warn!("DATABASE_URL not set, data will only live in memory");
            AppState::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryProductRepository::new()),
                Arc::clone(&session_service),
                image_store,
            )
        }
    };

    tokio::spawn(start_cleanup_task(
        session_service,
        CleanupConfig {
            cleanup_interval: config.revocation_sweep_interval,
        },
    ));

    let app = build_router(app_state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
