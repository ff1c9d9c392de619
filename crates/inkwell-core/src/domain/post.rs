use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inkwell_shared::dto::PostResponse;

use super::{Tag, UserSnapshot};
use crate::slug::slugify;

/// Post entity - a blog article owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub tags: Vec<Tag>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Create an unsaved post. The title is trimmed and the slug derived from it.
    pub fn new(user_id: Uuid, title: &str, content: String, tags: Vec<Tag>) -> Self {
        let now = Utc::now();
        let title = title.trim().to_string();
        Self {
            id: 0,
            user_id,
            slug: slugify(&title),
            title,
            content,
            tags,
            published_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A post together with the snapshot of its author.
#[derive(Debug, Clone)]
pub struct AuthoredPost {
    pub post: Post,
    pub author: UserSnapshot,
}

impl AuthoredPost {
    pub fn new(post: Post, author: UserSnapshot) -> Self {
        Self { post, author }
    }
}

impl From<AuthoredPost> for PostResponse {
    fn from(AuthoredPost { post, author }: AuthoredPost) -> Self {
        Self {
            id: post.id,
            tags: post.tags.iter().map(Into::into).collect(),
            title: post.title,
            slug: post.slug,
            content: post.content,
            user: author.into(),
            published_at: post.published_at,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
