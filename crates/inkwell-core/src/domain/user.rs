use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inkwell_shared::dto::{UserOnPost, UserResponse};

/// User entity - represents an author account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(name: String, username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            username,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id,
            name: self.name.clone(),
            username: self.username.clone(),
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// The subset of a user copied into post read models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: Uuid,
    pub name: String,
    pub username: String,
}

impl From<UserSnapshot> for UserOnPost {
    fn from(snapshot: UserSnapshot) -> Self {
        Self {
            id: snapshot.id.to_string(),
            name: snapshot.name,
            username: snapshot.username,
        }
    }
}
