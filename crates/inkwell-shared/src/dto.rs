//! Data Transfer Objects - request/response types for the API.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 100, message = "name is required (max 100 characters)"))]
    pub name: String,
    #[validate(length(min = 5, max = 30, message = "username must be 5-30 characters"))]
    pub username: String,
    #[validate(
        email(message = "invalid email address"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "password is required (max 100 characters)"))]
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        email(message = "invalid email address"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "password is required (max 100 characters)"))]
    pub password: String,
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(
        email(message = "invalid email address"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "password must be 1-100 characters"))]
    pub password: Option<String>,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Pointer to a tag inside a create-post request.
///
/// With an `id` the existing tag is reused; without one (or with `0`) a new tag
/// named `name` is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_tag_reference"))]
pub struct TagReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    #[validate(length(max = 20, message = "tag name must be at most 20 characters"))]
    pub name: String,
}

impl TagReference {
    /// Reference to an existing tag.
    pub fn existing(id: i64) -> Self {
        Self {
            id: Some(id),
            name: String::new(),
        }
    }

    /// Reference to a tag that should be created.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// The referenced tag id, treating `0` as "no id".
    pub fn existing_id(&self) -> Option<i64> {
        self.id.filter(|id| *id != 0)
    }
}

fn validate_tag_reference(reference: &TagReference) -> Result<(), ValidationError> {
    if reference.existing_id().is_none() && reference.name.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some(Cow::Borrowed("tag name is required when no id is given"));
        return Err(err);
    }
    Ok(())
}

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 100, message = "title is required (max 100 characters)"))]
    pub title: String,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<TagReference>,
}

/// Search/listing parameters for posts. Empty strings mean "no filter".
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchPostRequest {
    #[serde(default)]
    #[validate(length(max = 30, message = "username must be at most 30 characters"))]
    pub username: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 100, message = "title must be at most 100 characters"))]
    pub title: String,
    #[serde(default)]
    pub sort: String,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u64,
    #[serde(default = "default_size")]
    #[validate(range(min = 1, max = 100, message = "size must be between 1 and 100"))]
    pub size: u64,
}

fn default_page() -> u64 {
    1
}

fn default_size() -> u64 {
    10
}

impl Default for SearchPostRequest {
    fn default() -> Self {
        Self {
            username: String::new(),
            tags: Vec::new(),
            title: String::new(),
            sort: String::new(),
            page: default_page(),
            size: default_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Owner snapshot embedded in post responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserOnPost {
    pub id: String,
    pub name: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub tags: Vec<TagResponse>,
    pub user: UserOnPost,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_reference_requires_name_without_id() {
        assert!(TagReference::named("   ").validate().is_err());
        assert!(TagReference::named("rust").validate().is_ok());
        assert!(TagReference::existing(4).validate().is_ok());

        let zero_id = TagReference {
            id: Some(0),
            name: String::new(),
        };
        assert!(zero_id.validate().is_err());
    }

    #[test]
    fn tag_reference_name_is_bounded() {
        let long = TagReference::named("x".repeat(21));
        assert!(long.validate().is_err());
    }

    #[test]
    fn search_request_defaults_to_first_page() {
        let req: SearchPostRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.size, 10);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn search_request_rejects_oversized_page() {
        let req = SearchPostRequest {
            size: 101,
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_request_skips_absent_fields() {
        let req = UpdateUserRequest {
            name: Some("Ada".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"name":"Ada"}"#);
    }
}
