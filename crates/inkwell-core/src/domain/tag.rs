use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use inkwell_shared::dto::TagResponse;

use crate::slug::slugify;

/// Tag entity. Unsaved tags carry `id == 0` until storage assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create an unsaved tag, deriving the slug from the trimmed name.
    pub fn new(name: &str) -> Self {
        let name = name.trim().to_string();
        Self {
            id: 0,
            slug: slugify(&name),
            name,
            created_at: Utc::now(),
        }
    }
}

impl From<&Tag> for TagResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
            slug: tag.slug.clone(),
        }
    }
}
