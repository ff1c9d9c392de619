//! # Inkwell Shared
//!
//! Request and response types shared between the server and its clients.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, PageMetadata};
