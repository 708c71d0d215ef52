pub mod application_repository;
pub mod connection;
pub mod job_repository;
pub mod local;
pub mod migrations;
pub mod models;
pub mod repository;
pub mod user_repository;

use std::sync::Arc;

use sqlx::{Pool, Postgres};
use tracing::info;

use crate::api::error::MarketError;
use crate::config::{Config, StorageBackend};
use application_repository::PgApplicationRepository;
use job_repository::PgJobRepository;
use local::LocalStore;
pub use repository::Repositories;
use user_repository::PgUserRepository;

/// The persistence engine selected at startup
pub enum Backend {
    Local(Arc<LocalStore>),
    Postgres(Pool<Postgres>),
}

impl Backend {
    /// Open the backend named in `config`
    ///
    /// Postgres connections run pending migrations before returning.
    pub async fn connect(config: &Config) -> Result<Self, MarketError> {
        match config.storage_backend {
            StorageBackend::Local => {
                let store = match &config.data_dir {
                    Some(dir) => LocalStore::open(dir).await?,
                    None => {
                        info!("No DATA_DIR configured, keeping data in memory only");
                        LocalStore::in_memory()
                    }
                };
                Ok(Backend::Local(Arc::new(store)))
            }
            StorageBackend::Postgres => {
                let database_url = config.database_url.as_deref().ok_or_else(|| {
                    MarketError::Database(sqlx::Error::Configuration(
                        "DATABASE_URL must be set for the postgres backend".into(),
                    ))
                })?;
                let pool =
                    connection::get_connection(database_url, config.max_db_connections).await?;
                info!("Database connection pool established");

                migrations::run_migrations(&pool)
                    .await
                    .map_err(|e| MarketError::Database(e.into()))?;
                Ok(Backend::Postgres(pool))
            }
        }
    }

    pub fn repositories(&self) -> Repositories {
        match self {
            Backend::Local(store) => store.clone().into_repositories(),
            Backend::Postgres(pool) => Repositories {
                users: Arc::new(PgUserRepository::new(pool.clone())),
                jobs: Arc::new(PgJobRepository::new(pool.clone())),
                applications: Arc::new(PgApplicationRepository::new(pool.clone())),
            },
        }
    }

    pub async fn close(&self) {
        match self {
            Backend::Local(_) => info!("Local store needs no shutdown"),
            Backend::Postgres(pool) => {
                info!("Closing database connection pool...");
                pool.close().await;
                info!("Database connections closed");
            }
        }
    }
}

/// Map a unique-constraint violation to a domain error, anything else to
/// `MarketError::Database`.
pub(crate) fn unique_violation_or(
    err: sqlx::Error,
    on_conflict: impl FnOnce() -> MarketError,
) -> MarketError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => on_conflict(),
        _ => MarketError::Database(err),
    }
}
