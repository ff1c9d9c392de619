//! Storage engines: PostgreSQL via SeaORM, and an in-memory fallback.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod post_query;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
mod postgres_repo;
#[cfg(feature = "postgres")]
mod unit_of_work;

pub use connections::DatabaseConfig;
pub use memory::{InMemoryDatabase, InMemoryUnitOfWork};

#[cfg(feature = "postgres")]
pub use connections::PostgresDatabase;
#[cfg(feature = "postgres")]
pub use postgres_repo::{PostgresPostRepository, PostgresTagRepository, PostgresUserRepository};
#[cfg(feature = "postgres")]
pub use unit_of_work::PostgresUnitOfWork;
