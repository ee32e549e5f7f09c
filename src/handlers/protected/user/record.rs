use axum::{extract::Path, Json};
use serde_json::{json, Value};

use crate::database::models::User;
use crate::handlers::parse_user_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::user_service::{UpdateUserInput, UserService};

/// GET /api/v1/user/:id - Fetch a live user
pub async fn user_get(Path(id): Path<String>) -> ApiResult<User> {
    let id = parse_user_id(&id)?;
    let user = UserService::new().await?.get_by_id(id).await?;
    Ok(ApiResponse::success(user))
}

/// GET /api/v1/user/email/:email - Fetch a live user by email
pub async fn user_get_by_email(Path(email): Path<String>) -> ApiResult<User> {
    let user = UserService::new().await?.get_by_email(&email).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/v1/user/:id - Partial update; omitted fields are left unchanged
///
/// Passwords are not accepted here, see PUT /api/v1/user/:id/password.
pub async fn user_put(
    Path(id): Path<String>,
    Json(input): Json<UpdateUserInput>,
) -> ApiResult<User> {
    let id = parse_user_id(&id)?;
    let user = UserService::new().await?.update(id, input).await?;
    Ok(ApiResponse::success(user))
}

/// DELETE /api/v1/user/:id - Soft-delete the user and their settings
pub async fn user_delete(Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_user_id(&id)?;
    UserService::new().await?.delete(id).await?;
    Ok(ApiResponse::success(json!({ "message": "User deleted successfully" })))
}
