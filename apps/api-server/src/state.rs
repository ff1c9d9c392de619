//! Application state - shared across all handlers.

use std::sync::Arc;

use inkwell_core::ports::{PasswordService, TokenService, TransactionManager};
use inkwell_core::{PostService, UserService};
use inkwell_infra::{Argon2PasswordService, InMemoryDatabase, JwtTokenService};

#[cfg(feature = "postgres")]
use inkwell_infra::PostgresDatabase;

use crate::config::AppConfig;

/// Storage engine the services run on.
#[derive(Clone)]
pub enum Storage {
    InMemory,
    #[cfg(feature = "postgres")]
    Postgres(PostgresDatabase),
}

impl Storage {
    pub fn name(&self) -> &'static str {
        match self {
            Storage::InMemory => "in-memory",
            #[cfg(feature = "postgres")]
            Storage::Postgres(_) => "postgres",
        }
    }

    /// Whether the storage engine answers.
    pub async fn is_healthy(&self) -> bool {
        match self {
            Storage::InMemory => true,
            #[cfg(feature = "postgres")]
            Storage::Postgres(db) => db
                .ping()
                .await
                .inspect_err(|e| tracing::error!("Database ping failed: {}", e))
                .is_ok(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub posts: Arc<PostService>,
    pub tokens: Arc<dyn TokenService>,
    pub storage: Storage,
}

impl AppState {
    /// Build the application state, falling back to the in-memory store when no
    /// database is configured or reachable.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        #[cfg(feature = "postgres")]
        let (db, storage): (Arc<dyn TransactionManager>, Storage) = match &config.database {
            Some(db_config) => match PostgresDatabase::connect(db_config).await {
                Ok(db) => (Arc::new(db.clone()), Storage::Postgres(db)),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    (Arc::new(InMemoryDatabase::new()), Storage::InMemory)
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (Arc::new(InMemoryDatabase::new()), Storage::InMemory)
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, storage): (Arc<dyn TransactionManager>, Storage) = {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            (Arc::new(InMemoryDatabase::new()), Storage::InMemory)
        };

        let state = Self::build(db, storage, passwords, tokens);
        tracing::info!(storage = state.storage.name(), "Application state initialized");
        state
    }

    pub fn build(
        db: Arc<dyn TransactionManager>,
        storage: Storage,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users: Arc::new(UserService::new(db.clone(), passwords, tokens.clone())),
            posts: Arc::new(PostService::new(db)),
            tokens,
            storage,
        }
    }
}
