//! Domain entities - the core business objects.

mod post;
mod tag;
mod user;

pub use post::{AuthoredPost, Post};
pub use tag::Tag;
pub use user::{User, UserSnapshot};
