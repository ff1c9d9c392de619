//! Registration and login.

use actix_web::{HttpResponse, web};
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{LoginRequest, RegisterUserRequest};

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let user = state.users.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(user)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let auth = state.users.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(auth)))
}
