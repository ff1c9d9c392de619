//! HS256 access tokens for the blog API.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use inkwell_core::ports::{AuthError, TokenClaims, TokenService};

const DEFAULT_SECRET: &str = "change-me-in-production";
const DEFAULT_EXPIRATION_HOURS: i64 = 72;
const DEFAULT_ISSUER: &str = "inkwell-api";

/// Signing configuration for issued tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

impl JwtConfig {
    /// Read `JWT_SECRET`, `JWT_EXPIRATION_HOURS` and `JWT_ISSUER`.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_SECRET.to_string());

        if secret == DEFAULT_SECRET {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
                );
            } else {
                tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
            }
        }

        Self {
            secret,
            expiration_hours: std::env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|hours: &i64| *hours > 0)
                .unwrap_or(DEFAULT_EXPIRATION_HOURS),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    #[serde(default)]
    roles: Vec<String>,
    exp: i64,
    iat: i64,
    iss: String,
}

/// Issues and verifies bearer tokens carrying the user id as `sub`.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(
        &self,
        user_id: Uuid,
        email: &str,
        roles: Vec<String>,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            roles,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(TokenClaims {
            user_id,
            email: data.claims.email,
            roles: data.claims.roles,
            exp: data.claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str, issuer: &str) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: secret.to_string(),
            expiration_hours: 1,
            issuer: issuer.to_string(),
        })
    }

    #[test]
    fn test_round_trip_keeps_subject_and_roles() {
        let service = service("test-secret-key", "test-issuer");
        let user_id = Uuid::new_v4();

        let token = service
            .generate_token(user_id, "ada@example.com", vec!["admin".to_string()])
            .unwrap();
        assert!(!token.is_empty());

        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.roles, vec!["admin".to_string()]);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = service("test-secret-key", "test-issuer");

        let result = service.validate_token("not-a-token");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let token = service("secret-a", "inkwell-api")
            .generate_token(Uuid::new_v4(), "ada@example.com", vec![])
            .unwrap();

        assert!(service("secret-b", "inkwell-api").validate_token(&token).is_err());
    }

    #[test]
    fn test_token_from_other_issuer_is_rejected() {
        let token = service("same-secret", "issuer1")
            .generate_token(Uuid::new_v4(), "ada@example.com", vec![])
            .unwrap();

        assert!(service("same-secret", "issuer2").validate_token(&token).is_err());
    }

    #[test]
    fn test_default_lifetime_is_three_days() {
        let service = JwtTokenService::new(JwtConfig::default());
        assert_eq!(service.expiration_seconds(), 72 * 3600);
    }
}
