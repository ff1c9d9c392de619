#[cfg(feature = "postgres")]
use std::sync::Arc;
#[cfg(feature = "postgres")]
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the main database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// PostgreSQL storage engine. Each unit of work is one database transaction.
#[cfg(feature = "postgres")]
#[derive(Clone)]
pub struct PostgresDatabase {
    pub(crate) conn: Arc<DbConn>,
}

#[cfg(feature = "postgres")]
impl PostgresDatabase {
    /// Wrap an existing connection (pool or mock).
    pub fn new(conn: DbConn) -> Self {
        Self { conn: Arc::new(conn) }
    }

    /// Open the connection pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let conn = Database::connect(opts).await?;
        tracing::info!("Database connected (pool: {})", config.max_connections);

        Ok(Self { conn: Arc::new(conn) })
    }

    pub async fn ping(&self) -> Result<(), DbErr> {
        self.conn.ping().await
    }
}
