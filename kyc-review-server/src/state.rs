use std::sync::Arc;

use kyc_review_api::FileStorage;
use kyc_review_db::memory::MemoryUnitOfWork;
use kyc_review_db::unit_of_work::UnitOfWork;
use kyc_review_postgres::{init_database, PostgresUnitOfWork};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::{ConfigError, DatabaseBackend, ServerConfig, StorageBackend};
use crate::service::ReviewService;
use crate::session::SessionResolver;
use crate::storage::{HttpFileStorage, MemoryFileStorage};

/// Shared state of every route.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReviewService>,
    pub sessions: SessionResolver,
}

impl AppState {
    pub fn new(service: Arc<ReviewService>, sessions: SessionResolver) -> Self {
        Self { service, sessions }
    }

    /// Wires the configured backends together and seeds the bootstrap admin.
    pub async fn from_config(config: &ServerConfig) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let uow: Arc<dyn UnitOfWork> = match config.database.backend {
            DatabaseBackend::Postgres => {
                let url = config.database.url.as_deref().ok_or_else(|| ConfigError::InvalidValue {
                    key: "DATABASE_URL".to_string(),
                    message: "required for the postgres backend".to_string(),
                })?;
                let pool = PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .connect(url)
                    .await?;
                info!(max_connections = config.database.max_connections, "Connected to database");
                if config.database.run_migrations {
                    init_database(&pool).await?;
                }
                Arc::new(PostgresUnitOfWork::new(Arc::new(pool)))
            }
            DatabaseBackend::Memory => {
                info!("Using in-memory database backend");
                Arc::new(MemoryUnitOfWork::new())
            }
        };

        let storage: Arc<dyn FileStorage> = match config.storage.backend {
            StorageBackend::Http => {
                let url = config.storage.url.as_deref().ok_or_else(|| ConfigError::InvalidValue {
                    key: "KYC_STORAGE_URL".to_string(),
                    message: "required for the http storage backend".to_string(),
                })?;
                Arc::new(HttpFileStorage::new(url, config.storage.token.clone(), config.storage_timeout())?)
            }
            StorageBackend::Memory => {
                info!("Using in-memory file storage");
                Arc::new(MemoryFileStorage::default())
            }
        };

        let service = Arc::new(ReviewService::new(uow.clone(), storage));
        if let Some(admin) = &config.bootstrap_admin {
            service.seed_admin(&admin.email, &admin.name, admin.agency_id).await?;
        }

        let sessions = SessionResolver::new(uow, config.session_cache_ttl());
        Ok(Self::new(service, sessions))
    }
}
