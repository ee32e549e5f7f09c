// handlers/public/auth/register.rs - POST /api/v1/user handler

use axum::Json;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::user_service::{CreateUserInput, UserService};

/**
 * POST /api/v1/user - Register a new user account
 *
 * Expected Input:
 * ```json
 * {
 *   "email": "ada@example.com",
 *   "password": "Secret123",
 *   "first_name": "Ada",
 *   "last_name": "Lovelace",
 *   "role": "user"           // Optional, defaults to "user"
 * }
 * ```
 *
 * A default settings row is created alongside the user. The stored password
 * is never part of the response.
 *
 * Errors: 400 policy/shape violations, 409 duplicate email,
 * 503 when the database is disabled.
 */
pub async fn register_post(Json(input): Json<CreateUserInput>) -> ApiResult<User> {
    let service = UserService::new().await?;
    let user = service.create_user(input).await?;
    Ok(ApiResponse::created(user))
}
