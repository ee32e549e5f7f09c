use axum::{extract::Path, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::handlers::parse_user_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;

#[derive(Debug, Deserialize)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

/// PUT /api/v1/user/:id/password - Change password after confirming the current one
///
/// 401 when the current password does not match, 400 when the new one fails
/// the password policy.
pub async fn password_put(
    Path(id): Path<String>,
    Json(request): Json<PasswordChangeRequest>,
) -> ApiResult<Value> {
    let id = parse_user_id(&id)?;
    UserService::new()
        .await?
        .update_password(id, &request.current_password, &request.new_password)
        .await?;
    Ok(ApiResponse::success(json!({ "message": "Password updated successfully" })))
}

/// PUT /api/v1/user/:id/activate
pub async fn activate_put(Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_user_id(&id)?;
    UserService::new().await?.activate(id).await?;
    Ok(ApiResponse::success(json!({ "message": "User account activated successfully" })))
}

/// PUT /api/v1/user/:id/deactivate
///
/// Blocks future logins. Tokens issued before deactivation keep working
/// until they expire.
pub async fn deactivate_put(Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_user_id(&id)?;
    UserService::new().await?.deactivate(id).await?;
    Ok(ApiResponse::success(json!({ "message": "User account deactivated successfully" })))
}
