// handlers/public/auth/login.rs - POST /api/v1/user/login handler

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/**
 * POST /api/v1/user/login - Authenticate and receive a JWT
 *
 * Expected Output (Success):
 * ```json
 * {
 *   "success": true,
 *   "data": {
 *     "token": "eyJhbGciOiJIUzI1NiI...",
 *     "user": { "id": 1, "email": "ada@example.com", ... }
 *   }
 * }
 * ```
 *
 * The token is valid for 24 hours and goes in `Authorization: Bearer <token>`.
 * Unknown email and wrong password both answer 401 "Invalid credentials";
 * a deactivated account answers 403.
 */
pub async fn login_post(Json(request): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    let service = UserService::new().await?;
    let user = service
        .validate_credentials(&request.email, &request.password)
        .await?;

    let token = auth::issuer().issue(user.id, &user.email)?;
    tracing::info!("Issued token for user {} ({})", user.id, user.email);

    Ok(ApiResponse::success(LoginResponse { token, user }))
}
