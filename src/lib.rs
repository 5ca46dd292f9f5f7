pub mod auth;
pub mod config;
pub mod db;
pub mod error;

use std::sync::Arc;
use std::time::Duration;
use actix_web::{web, HttpResponse};
use tracing::info;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use crate::config::Settings;

pub use auth::AuthService;
pub use db::{CredentialStore, MemoryCredentialStore, PgCredentialStore};

use crate::config::StoreBackend;

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Registers every route of the service.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .configure(auth::handlers::configure);
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    pub async fn new(config: Settings) -> Result<Self> {
        let store: Arc<dyn CredentialStore> = match config.database.backend {
            StoreBackend::Postgres => {
                let store = PgCredentialStore::new_with_options(
                    &config.database.url,
                    config.database.max_connections,
                    Duration::from_secs(config.database.acquire_timeout_secs),
                )
                .await?;
                store.migrate().await?;
                info!("Using Postgres credential store");
                Arc::new(store)
            }
            StoreBackend::Memory => {
                info!("Using in-memory credential store; accounts are lost on exit");
                Arc::new(MemoryCredentialStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Settings, store: Arc<dyn CredentialStore>) -> Self {
        let auth_service = AuthService::new(store, &config.auth);
        Self {
            config: Arc::new(config),
            auth_service: Arc::new(auth_service),
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.auth_service.store().close().await;
        Ok(())
    }
}
