//! Post search query composition.
//!
//! A [`SearchPostRequest`] is normalized into a [`PostQuery`]: the optional
//! filters (AND-combined across dimensions, OR within the tag list), the sort
//! order and the page window. Storage backends translate it into their own
//! predicate; [`PostQuery::matches`] is the reference evaluation.

use std::cmp::Ordering;

use inkwell_shared::dto::SearchPostRequest;
use validator::Validate;

use crate::domain::{Post, UserSnapshot};
use crate::error::DomainError;
use crate::pagination::PageRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Latest,
    /// Oldest first.
    Oldest,
}

impl SortOrder {
    /// Parse the request's `sort` value; unknown values fall back to latest.
    pub fn parse(sort: &str) -> Self {
        match sort {
            "oldest" => SortOrder::Oldest,
            _ => SortOrder::Latest,
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, SortOrder::Latest)
    }

    /// Compare two posts by creation time (ties broken by id) in this order.
    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        let ascending = a
            .created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id));
        match self {
            SortOrder::Latest => ascending.reverse(),
            SortOrder::Oldest => ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    /// Exact owner username.
    pub username: Option<String>,
    /// Post must carry at least one of these tag slugs.
    pub tag_slugs: Option<Vec<String>>,
    /// Case-sensitive substring of the title.
    pub title: Option<String>,
    pub order: SortOrder,
    pub page: PageRequest,
}

impl PostQuery {
    pub fn from_request(request: &SearchPostRequest) -> Result<Self, DomainError> {
        request.validate()?;

        let tag_slugs: Vec<String> = request
            .tags
            .iter()
            .filter(|slug| !slug.is_empty())
            .cloned()
            .collect();

        Ok(Self {
            username: non_empty(&request.username),
            tag_slugs: (!tag_slugs.is_empty()).then_some(tag_slugs),
            title: non_empty(&request.title),
            order: SortOrder::parse(&request.sort),
            page: PageRequest::new(request.page, request.size)?,
        })
    }

    /// Evaluate the filter part of the query against one post.
    ///
    /// Soft-deleted posts never match.
    pub fn matches(&self, post: &Post, author: &UserSnapshot) -> bool {
        if post.is_deleted() {
            return false;
        }
        if let Some(username) = &self.username {
            if &author.username != username {
                return false;
            }
        }
        if let Some(slugs) = &self.tag_slugs {
            if !post.tags.iter().any(|tag| slugs.contains(&tag.slug)) {
                return false;
            }
        }
        if let Some(title) = &self.title {
            if !post.title.contains(title.as_str()) {
                return false;
            }
        }
        true
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
