//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors render through `auth::AppError`.

mod config;

use auth::application::{AddUserInput, AddUserUseCase};
use auth::domain::value_object::user_role::UserRole;
use auth::{InMemoryAuthStore, auth_router};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ApiConfig, DEFAULT_SEED_ADMIN};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;

    tracing::info!(
        hash_algorithm = config.auth.hash_algorithm.name(),
        cookie_secure = config.auth.cookie_secure,
        "Configuration loaded"
    );

    // Users live in memory for the process lifetime; seed the admin
    let store = InMemoryAuthStore::new();

    AddUserUseCase::new(Arc::new(store.clone()), Arc::new(config.auth.clone()))
        .execute(AddUserInput {
            identity: config.seed_admin_user.clone(),
            password: config.seed_admin_password.clone(),
            role: UserRole::Admin,
        })
        .await?;

    if config.seed_admin_password == DEFAULT_SEED_ADMIN {
        tracing::warn!(
            identity = %config.seed_admin_user,
            "Seed admin uses the default password; set SEED_ADMIN_PASSWORD"
        );
    }

    // Build router
    let app = Router::new()
        .merge(auth_router(store, config.auth))
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
