#![allow(dead_code)]

use std::sync::Arc;

use inkwell_core::ports::{AuthError, PasswordService, TransactionManager};
use inkwell_core::{PostService, UserService};
use inkwell_infra::{InMemoryDatabase, JwtConfig, JwtTokenService};
use inkwell_shared::dto::{CreatePostRequest, RegisterUserRequest, TagReference, UserResponse};
use uuid::Uuid;

/// Reversible stand-in for Argon2 so tests stay fast.
pub struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash.strip_prefix("plain:") == Some(password))
    }
}

pub struct TestApp {
    pub db: InMemoryDatabase,
    pub users: UserService,
    pub posts: PostService,
}

impl TestApp {
    pub fn new() -> Self {
        let db = InMemoryDatabase::new();
        let manager: Arc<dyn TransactionManager> = Arc::new(db.clone());
        let tokens = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "integration-secret".to_string(),
            expiration_hours: 72,
            issuer: "inkwell-test".to_string(),
        }));

        Self {
            users: UserService::new(manager.clone(), Arc::new(PlainPasswords), tokens),
            posts: PostService::new(manager),
            db,
        }
    }

    pub async fn register(&self, username: &str) -> UserResponse {
        self.users
            .register(register_request(username))
            .await
            .expect("register user")
    }

    pub async fn register_id(&self, username: &str) -> Uuid {
        Uuid::parse_str(&self.register(username).await.id).expect("uuid id")
    }
}

pub fn register_request(username: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        name: format!("{username} name"),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "hunter22".to_string(),
    }
}

pub fn post_request(title: &str, tags: Vec<TagReference>) -> CreatePostRequest {
    CreatePostRequest {
        title: title.to_string(),
        content: format!("Body of {title}"),
        tags,
    }
}
