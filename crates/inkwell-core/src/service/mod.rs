//! Request-scoped workflows. Each operation runs inside exactly one unit of work.

mod post;
mod tag;
mod user;

pub use post::PostService;
pub use tag::resolve_tags;
pub use user::UserService;
