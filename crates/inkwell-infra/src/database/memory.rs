//! In-memory storage engine - used when no database is configured, and in tests.
//!
//! Units of work are serialized by an async mutex. Each one mutates a private
//! copy of the tables which replaces the shared state on commit; dropping it
//! discards the copy. Uniqueness and foreign-key rules mirror the SQL schema.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use inkwell_core::domain::{AuthoredPost, Post, Tag, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{
    BaseRepository, PostRepository, TagRepository, TransactionManager, UnitOfWork, UserRepository,
};
use inkwell_core::query::PostQuery;

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeMap<Uuid, User>,
    tags: BTreeMap<i64, Tag>,
    posts: BTreeMap<i64, Post>,
    last_tag_id: i64,
    last_post_id: i64,
}

impl Tables {
    fn author_of(&self, post: &Post) -> Result<&User, RepoError> {
        self.users
            .get(&post.user_id)
            .ok_or_else(|| RepoError::Query(format!("post {} has no author", post.id)))
    }

    fn check_user_unique(&self, user: &User) -> Result<(), RepoError> {
        let clash = self.users.values().find(|other| {
            other.id != user.id && (other.username == user.username || other.email == user.email)
        });
        match clash {
            Some(other) if other.username == user.username => Err(RepoError::Constraint(
                "duplicate key value violates unique constraint \"users_username_key\"".to_string(),
            )),
            Some(_) => Err(RepoError::Constraint(
                "duplicate key value violates unique constraint \"users_email_key\"".to_string(),
            )),
            None => Ok(()),
        }
    }
}

/// In-memory transactional store.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<AsyncMutex<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionManager for InMemoryDatabase {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepoError> {
        let committed = Arc::clone(&self.tables).lock_owned().await;
        let working = Mutex::new(committed.clone());
        Ok(Box::new(InMemoryUnitOfWork { committed, working }))
    }
}

/// One in-memory transaction.
pub struct InMemoryUnitOfWork {
    committed: OwnedMutexGuard<Tables>,
    working: Mutex<Tables>,
}

impl InMemoryUnitOfWork {
    fn with_tables<R>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<R, RepoError>,
    ) -> Result<R, RepoError> {
        let mut tables = self
            .working
            .lock()
            .map_err(|_| RepoError::Query("in-memory store poisoned".to_string()))?;
        f(&mut tables)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn posts(&self) -> &dyn PostRepository {
        self
    }

    fn tags(&self) -> &dyn TagRepository {
        self
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let Self {
            mut committed,
            working,
        } = *self;
        *committed = working
            .into_inner()
            .map_err(|_| RepoError::Query("in-memory store poisoned".to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUnitOfWork {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        self.with_tables(|t| Ok(t.users.get(&id).filter(|u| !u.is_deleted()).cloned()))
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        self.with_tables(|t| {
            if t.users.contains_key(&user.id) {
                return Err(RepoError::Constraint(
                    "duplicate key value violates unique constraint \"users_pkey\"".to_string(),
                ));
            }
            t.check_user_unique(&user)?;
            t.users.insert(user.id, user.clone());
            Ok(user)
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryUnitOfWork {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        self.with_tables(|t| {
            Ok(t.users
                .values()
                .find(|u| u.email == email && !u.is_deleted())
                .cloned())
        })
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        self.with_tables(|t| {
            if !t.users.contains_key(&user.id) {
                return Err(RepoError::NotFound);
            }
            t.check_user_unique(&user)?;
            t.users.insert(user.id, user.clone());
            Ok(user)
        })
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.with_tables(|t| match t.users.get_mut(&id) {
            Some(user) if !user.is_deleted() => {
                user.deleted_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(RepoError::NotFound),
        })
    }
}

#[async_trait]
impl BaseRepository<Tag, i64> for InMemoryUnitOfWork {
    async fn find_by_id(&self, id: i64) -> Result<Option<Tag>, RepoError> {
        self.with_tables(|t| Ok(t.tags.get(&id).cloned()))
    }

    async fn insert(&self, mut tag: Tag) -> Result<Tag, RepoError> {
        self.with_tables(|t| {
            if let Some(other) = t
                .tags
                .values()
                .find(|other| other.name == tag.name || other.slug == tag.slug)
            {
                let key = if other.name == tag.name { "name" } else { "slug" };
                return Err(RepoError::Constraint(format!(
                    "duplicate key value violates unique constraint \"tags_{key}_key\""
                )));
            }
            t.last_tag_id += 1;
            tag.id = t.last_tag_id;
            t.tags.insert(tag.id, tag.clone());
            Ok(tag)
        })
    }
}

impl TagRepository for InMemoryUnitOfWork {}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryUnitOfWork {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        self.with_tables(|t| Ok(t.posts.get(&id).filter(|p| !p.is_deleted()).cloned()))
    }

    async fn insert(&self, mut post: Post) -> Result<Post, RepoError> {
        self.with_tables(|t| {
            if !t.users.contains_key(&post.user_id) {
                return Err(RepoError::Constraint(
                    "insert on table \"posts\" violates foreign key constraint \"fk-posts-user_id\""
                        .to_string(),
                ));
            }
            if post.tags.iter().any(|tag| !t.tags.contains_key(&tag.id)) {
                return Err(RepoError::Constraint(
                    "insert on table \"post_tags\" violates foreign key constraint \"fk-post_tags-tag_id\""
                        .to_string(),
                ));
            }

            let mut linked: Vec<Tag> = Vec::with_capacity(post.tags.len());
            for tag in post.tags.drain(..) {
                if !linked.iter().any(|seen| seen.id == tag.id) {
                    linked.push(tag);
                }
            }
            post.tags = linked;

            t.last_post_id += 1;
            post.id = t.last_post_id;
            t.posts.insert(post.id, post.clone());
            Ok(post)
        })
    }
}

#[async_trait]
impl PostRepository for InMemoryUnitOfWork {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<AuthoredPost>, RepoError> {
        self.with_tables(|t| {
            let Some(post) = t
                .posts
                .values()
                .find(|p| p.slug == slug && !p.is_deleted())
            else {
                return Ok(None);
            };
            let author = t.author_of(post)?.snapshot();
            Ok(Some(AuthoredPost::new(post.clone(), author)))
        })
    }

    async fn search(&self, query: &PostQuery) -> Result<(Vec<AuthoredPost>, u64), RepoError> {
        self.with_tables(|t| {
            let mut matching = Vec::new();
            for post in t.posts.values() {
                let author = t.author_of(post)?.snapshot();
                if query.matches(post, &author) {
                    matching.push(AuthoredPost::new(post.clone(), author));
                }
            }

            let total = matching.len() as u64;
            matching.sort_by(|a, b| query.order.compare(&a.post, &b.post));

            let page = matching
                .into_iter()
                .skip(query.page.offset() as usize)
                .take(query.page.limit() as usize)
                .collect();

            Ok((page, total))
        })
    }
}
