use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AuthoredPost, Post, Tag, User};
use crate::error::RepoError;
use crate::query::PostQuery;

/// Generic repository trait shared by every entity.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID. Soft-deleted rows are not returned.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity and return it as stored (with generated ID).
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Overwrite the stored row with `user`.
    async fn update(&self, user: User) -> Result<User, RepoError>;

    /// Mark the user deleted without removing the row.
    async fn soft_delete(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Tag repository. Tags are only created and looked up by id.
pub trait TagRepository: BaseRepository<Tag, i64> {}

/// Post repository. `insert` also writes the post's tag associations.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<AuthoredPost>, RepoError>;

    /// Fetch one page of posts matching `query` plus the total match count.
    async fn search(&self, query: &PostQuery) -> Result<(Vec<AuthoredPost>, u64), RepoError>;
}

/// One transactional scope.
///
/// Every repository handed out reads and writes inside the same transaction.
/// Dropping the unit of work without calling [`UnitOfWork::commit`] rolls it back.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> &dyn UserRepository;

    fn posts(&self) -> &dyn PostRepository;

    fn tags(&self) -> &dyn TagRepository;

    async fn commit(self: Box<Self>) -> Result<(), RepoError>;
}

/// Entry point to the storage engine.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepoError>;
}
