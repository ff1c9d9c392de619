//! Profile update and account deletion.

use actix_web::{HttpResponse, web};
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::UpdateUserRequest;
use uuid::Uuid;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const ADMIN_ROLE: &str = "admin";

/// PATCH /api/users
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let user = state.users.update(identity.user_id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(user)))
}

/// DELETE /api/users/{user_id}
///
/// Callers may delete themselves; admins may delete anyone.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = path.into_inner();

    let is_self = Uuid::parse_str(&user_id).is_ok_and(|id| id == identity.user_id);
    if !is_self && !identity.has_role(ADMIN_ROLE) {
        tracing::warn!(caller = %identity.user_id, target = %user_id, "Delete forbidden");
        return Err(AppError::Forbidden);
    }

    state.users.delete(&user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(true, "User deleted")))
}
