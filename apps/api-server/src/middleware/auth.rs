//! Bearer token extractor.

use std::future::{Ready, ready};

use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use uuid::Uuid;

use inkwell_core::ports::{AuthError, TokenClaims};
use inkwell_shared::ErrorResponse;

use crate::state::AppState;

/// Authenticated caller, taken from a valid `Authorization: Bearer` token.
///
/// ```ignore
/// async fn create_post(identity: Identity) -> impl Responder {
///     format!("Hello, user {}!", identity.user_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub roles: Vec<String>,
}

impl Identity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            roles: claims.roles,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::MissingAuth => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::HashingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please login again."),
            AuthError::InvalidToken(_) => ErrorResponse::new(401, "Invalid Token"),
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            AuthError::HashingError(_) => ErrorResponse::internal_error(),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthenticationError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthenticationError(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        )));
    };

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthenticationError(AuthError::MissingAuth))?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AuthenticationError(AuthError::InvalidToken("Expected Bearer token".to_string()))
        })?;

    state
        .tokens
        .validate_token(token)
        .map(Identity::from)
        .map_err(|e| {
            tracing::warn!("Rejected bearer token: {}", e);
            AuthenticationError(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_auth_error_responses() {
        let cases = [
            (AuthError::MissingAuth, 401, "Authentication Required"),
            (AuthError::TokenExpired, 401, "Token Expired"),
            (AuthError::InvalidToken("bad signature".into()), 401, "Invalid Token"),
            (AuthError::HashingError("salt".into()), 500, "Internal Server Error"),
        ];

        for (err, status, title) in cases {
            let error = AuthenticationError(err);
            assert_eq!(error.status_code().as_u16(), status);

            let body = to_bytes(error.error_response().into_body()).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body["status"], status);
            assert_eq!(body["title"], title);
        }
    }

    #[test]
    fn test_identity_roles() {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            roles: vec!["user".to_string()],
        };
        assert!(identity.has_role("user"));
        assert!(!identity.has_role("admin"));
    }
}
