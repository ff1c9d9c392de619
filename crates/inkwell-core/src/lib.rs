//! # Inkwell Core
//!
//! The domain layer of the Inkwell blogging backend.
//! This crate contains pure business logic: entities, ports, the post query
//! builder, tag resolution and the post/user workflows. Storage, hashing and
//! tokens are reached only through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod query;
pub mod service;
pub mod slug;

pub use error::DomainError;
pub use pagination::{Page, PageRequest};
pub use query::{PostQuery, SortOrder};
pub use service::{PostService, UserService};
pub use slug::slugify;
