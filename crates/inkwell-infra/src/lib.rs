//! # Inkwell Infrastructure
//!
//! Concrete implementations of the ports defined in `inkwell-core`.
//! This crate contains the storage backends and the auth services.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory storage only
//! - `postgres` - PostgreSQL storage via SeaORM
//! - `auth` - JWT + Argon2 authentication

pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

pub use database::{DatabaseConfig, InMemoryDatabase};

#[cfg(feature = "postgres")]
pub use database::PostgresDatabase;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
