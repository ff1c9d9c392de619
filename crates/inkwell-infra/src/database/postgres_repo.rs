//! PostgreSQL repository implementations.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, LoaderTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use inkwell_core::domain::{AuthoredPost, Post, Tag, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, PostRepository, TagRepository, UserRepository};
use inkwell_core::query::PostQuery;

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::Entity as TagEntity;
use super::entity::user::{self, Entity as UserEntity};
use super::post_query;
use super::postgres_base::{PostgresBaseRepository, SoftDelete, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

impl SoftDelete for UserEntity {
    fn deleted_at_column() -> Option<user::Column> {
        Some(user::Column::DeletedAt)
    }
}

impl SoftDelete for TagEntity {}

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}@{domain}")
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::DeletedAt.is_null())
            .one(self.txn.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let active_model: user::ActiveModel = user.into();
        let model = active_model
            .update(self.txn.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn soft_delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = UserEntity::update_many()
            .col_expr(
                user::Column::DeletedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().fixed_offset()),
            )
            .filter(user::Column::Id.eq(id))
            .filter(user::Column::DeletedAt.is_null())
            .exec(self.txn.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

impl TagRepository for PostgresTagRepository {}

/// PostgreSQL post repository. Posts aggregate their tags and author, so they
/// don't go through the generic base.
pub struct PostgresPostRepository {
    txn: Arc<DatabaseTransaction>,
}

impl PostgresPostRepository {
    pub fn new(txn: Arc<DatabaseTransaction>) -> Self {
        Self { txn }
    }

    /// Attach authors and tags to a batch of post rows, preserving row order.
    async fn hydrate(&self, models: Vec<post::Model>) -> Result<Vec<AuthoredPost>, RepoError> {
        let conn = self.txn.as_ref();
        let authors = models
            .load_one(UserEntity, conn)
            .await
            .map_err(map_db_err)?;
        let tags = models
            .load_many_to_many(TagEntity, PostTagEntity, conn)
            .await
            .map_err(map_db_err)?;

        models
            .into_iter()
            .zip(authors)
            .zip(tags)
            .map(|((model, author), tags)| {
                let author = author.ok_or_else(|| {
                    RepoError::Query(format!("post {} has no author", model.id))
                })?;
                let author = User::from(author).snapshot();
                let tags = tags.into_iter().map(Into::into).collect();
                Ok(AuthoredPost::new(model.into_domain(tags), author))
            })
            .collect()
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for PostgresPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let conn = self.txn.as_ref();
        let Some(model) = PostEntity::find_by_id(id)
            .filter(post::Column::DeletedAt.is_null())
            .one(conn)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let tags = model
            .find_related(TagEntity)
            .all(conn)
            .await
            .map_err(map_db_err)?;

        Ok(Some(model.into_domain(tags.into_iter().map(Into::into).collect())))
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let conn = self.txn.as_ref();
        let model = post::ActiveModel::from(&post)
            .insert(conn)
            .await
            .map_err(map_db_err)?;

        // The association is a set; a tag referenced twice is linked once.
        let mut seen = HashSet::new();
        let tags: Vec<Tag> = post
            .tags
            .into_iter()
            .filter(|tag| seen.insert(tag.id))
            .collect();

        if !tags.is_empty() {
            let links = tags.iter().map(|tag| post_tag::ActiveModel {
                post_id: Set(model.id),
                tag_id: Set(tag.id),
            });
            PostTagEntity::insert_many(links)
                .exec_without_returning(conn)
                .await
                .map_err(map_db_err)?;
        }

        tracing::debug!(post_id = model.id, tags = tags.len(), "Post row inserted");
        Ok(model.into_domain(tags))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<AuthoredPost>, RepoError> {
        let models = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::DeletedAt.is_null())
            .order_by_asc(post::Column::Id)
            .limit(1)
            .all(self.txn.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(self.hydrate(models).await?.into_iter().next())
    }

    async fn search(&self, query: &PostQuery) -> Result<(Vec<AuthoredPost>, u64), RepoError> {
        let conn = self.txn.as_ref();
        let select = post_query::filtered(query);

        let total = select.clone().count(conn).await.map_err(map_db_err)?;

        let models = post_query::paged(post_query::ordered(select, query.order), query.page)
            .all(conn)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(total, page = query.page.page(), "Post search executed");
        Ok((self.hydrate(models).await?, total))
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("alice@example.com"), "a***@example.com");
        assert_eq!(mask_email("a@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
