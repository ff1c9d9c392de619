//! Post workflow: create, list and lookup by slug.

use std::sync::Arc;

use inkwell_shared::dto::{CreatePostRequest, PostResponse, SearchPostRequest};
use uuid::Uuid;
use validator::Validate;

use super::tag::resolve_tags;
use crate::domain::{AuthoredPost, Post};
use crate::error::DomainError;
use crate::pagination::Page;
use crate::ports::TransactionManager;
use crate::query::PostQuery;

pub struct PostService {
    db: Arc<dyn TransactionManager>,
}

impl PostService {
    pub fn new(db: Arc<dyn TransactionManager>) -> Self {
        Self { db }
    }

    /// Create a post owned by `user_id`, creating or reusing its tags.
    ///
    /// Tags, post and associations are written in one unit of work; any failure
    /// leaves storage untouched.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreatePostRequest,
    ) -> Result<PostResponse, DomainError> {
        request
            .validate()
            .inspect_err(|e| tracing::warn!("Invalid create post request: {}", e))?;

        let uow = self.db.begin().await?;

        let tags = resolve_tags(uow.as_ref(), &request.tags).await?;

        let post = Post::new(user_id, &request.title, request.content, tags);
        let post = uow
            .posts()
            .insert(post)
            .await
            .inspect_err(|e| tracing::warn!("Failed to create post: {}", e))?;

        let owner = uow.users().find_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!(%user_id, "Post owner not found");
            DomainError::Storage("post owner not found".to_string())
        })?;

        uow.commit()
            .await
            .inspect_err(|e| tracing::warn!("Failed to commit transaction: {}", e))?;

        tracing::info!(post_id = post.id, slug = %post.slug, "Post created");
        Ok(AuthoredPost::new(post, owner.snapshot()).into())
    }

    /// List posts matching the search request, one page at a time.
    pub async fn list(&self, request: &SearchPostRequest) -> Result<Page<PostResponse>, DomainError> {
        let query = PostQuery::from_request(request)
            .inspect_err(|e| tracing::warn!("Invalid search request: {}", e))?;

        let uow = self.db.begin().await?;
        let (posts, total) = uow
            .posts()
            .search(&query)
            .await
            .inspect_err(|e| tracing::warn!("Failed to get posts: {}", e))?;
        uow.commit().await?;

        let page = Page {
            items: posts,
            paging: query.page.metadata(total),
        };
        Ok(page.map(PostResponse::from))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<PostResponse, DomainError> {
        let uow = self.db.begin().await?;
        let post = uow.posts().find_by_slug(slug).await?.ok_or_else(|| {
            tracing::warn!(slug, "Post not found");
            DomainError::not_found("post")
        })?;
        uow.commit().await?;

        Ok(post.into())
    }
}
