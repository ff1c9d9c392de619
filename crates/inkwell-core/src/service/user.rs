//! User workflow: registration, login, profile update and deletion.

use std::sync::Arc;

use chrono::Utc;
use inkwell_shared::dto::{
    AuthResponse, LoginRequest, RegisterUserRequest, UpdateUserRequest, UserResponse,
};
use uuid::{Uuid, Version};
use validator::Validate;

use crate::domain::User;
use crate::error::DomainError;
use crate::ports::{AuthError, PasswordService, TokenService, TransactionManager};

pub const DEFAULT_ROLE: &str = "user";

pub struct UserService {
    db: Arc<dyn TransactionManager>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl UserService {
    pub fn new(
        db: Arc<dyn TransactionManager>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            db,
            passwords,
            tokens,
        }
    }

    pub async fn register(&self, request: RegisterUserRequest) -> Result<UserResponse, DomainError> {
        request
            .validate()
            .inspect_err(|e| tracing::warn!("Invalid register request: {}", e))?;

        let uow = self.db.begin().await?;

        let password_hash = self.passwords.hash(&request.password).map_err(hashing_failed)?;
        let user = User::new(request.name, request.username, request.email, password_hash);
        let user = uow
            .users()
            .insert(user)
            .await
            .inspect_err(|e| tracing::warn!("Failed to create user: {}", e))?;

        uow.commit().await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(UserResponse::from(&user))
    }

    /// Authenticate by email and password.
    ///
    /// Unknown emails and wrong passwords fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, DomainError> {
        request
            .validate()
            .inspect_err(|e| tracing::warn!("Invalid login request: {}", e))?;

        let uow = self.db.begin().await?;

        let Some(user) = uow.users().find_by_email(&request.email).await? else {
            tracing::warn!("Login failed: unknown account");
            return Err(DomainError::Unauthorized);
        };

        let valid = self
            .passwords
            .verify(&request.password, &user.password_hash)
            .map_err(hashing_failed)?;
        if !valid {
            tracing::warn!(user_id = %user.id, "Login failed: password mismatch");
            return Err(DomainError::Unauthorized);
        }

        let token = self
            .tokens
            .generate_token(user.id, &user.email, vec![DEFAULT_ROLE.to_string()])
            .map_err(|e| {
                tracing::warn!("Failed to create token: {}", e);
                DomainError::Storage("token generation failed".to_string())
            })?;

        uow.commit().await?;

        Ok(AuthResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.expiration_seconds().max(0) as u64,
        })
    }

    /// Overwrite the provided profile fields; the password is re-hashed.
    pub async fn update(
        &self,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<UserResponse, DomainError> {
        request
            .validate()
            .inspect_err(|e| tracing::warn!("Invalid update request: {}", e))?;

        let uow = self.db.begin().await?;

        let Some(mut user) = uow.users().find_by_id(user_id).await? else {
            tracing::warn!(%user_id, "User not found");
            return Err(DomainError::not_found("user"));
        };

        if let Some(name) = request.name {
            user.name = name;
        }
        if let Some(email) = request.email {
            user.email = email;
        }
        if let Some(password) = request.password {
            user.password_hash = self.passwords.hash(&password).map_err(hashing_failed)?;
        }
        user.updated_at = Utc::now();

        let user = uow
            .users()
            .update(user)
            .await
            .inspect_err(|e| tracing::warn!("Failed to save user: {}", e))?;

        uow.commit().await?;

        Ok(UserResponse::from(&user))
    }

    /// Soft-delete the user with the given id.
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let user_id = Uuid::parse_str(id)
            .ok()
            .filter(|id| id.get_version() == Some(Version::Random))
            .ok_or_else(|| {
                tracing::warn!("Invalid user id");
                DomainError::Validation("invalid user id".to_string())
            })?;

        let uow = self.db.begin().await?;

        if uow.users().find_by_id(user_id).await?.is_none() {
            tracing::warn!(%user_id, "User not found");
            return Err(DomainError::not_found("user"));
        }

        uow.users()
            .soft_delete(user_id)
            .await
            .inspect_err(|e| tracing::warn!("Failed to delete user: {}", e))?;

        uow.commit().await?;

        tracing::info!(%user_id, "User deleted");
        Ok(())
    }
}

fn hashing_failed(err: AuthError) -> DomainError {
    tracing::warn!("Password hashing failed: {}", err);
    DomainError::Storage("password hashing failed".to_string())
}
