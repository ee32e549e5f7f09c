// handlers/protected/auth/whoami.rs - GET /api/v1/auth/whoami handler

use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/v1/auth/whoami - Echo the identity carried by the presented token
///
/// Answers from the token alone, so it works with the database disabled.
///
/// Expected Output:
/// ```json
/// { "success": true, "data": { "user_id": 42, "email": "ada@example.com" } }
/// ```
pub async fn whoami_get(Extension(user): Extension<AuthUser>) -> ApiResult<AuthUser> {
    Ok(ApiResponse::success(user))
}
