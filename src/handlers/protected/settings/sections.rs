use axum::{extract::Path, Json};
use serde_json::{json, Value};

use crate::handlers::parse_user_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::settings_service::{
    GeneralSettingsInput, NotificationSettingsInput, PrivacySettingsInput, SettingsService,
};

/**
 * PUT /api/v1/settings/:user_id/notifications
 *
 * ```json
 * { "email_enabled": true, "push_enabled": false, "frequency": "weekly" }
 * ```
 *
 * `frequency` is one of daily, weekly, monthly.
 */
pub async fn notifications_put(
    Path(user_id): Path<String>,
    Json(input): Json<NotificationSettingsInput>,
) -> ApiResult<Value> {
    let user_id = parse_user_id(&user_id)?;
    SettingsService::new()
        .await?
        .update_notifications(user_id, input)
        .await?;
    Ok(ApiResponse::success(
        json!({ "message": "Notification settings updated successfully" }),
    ))
}

/**
 * PUT /api/v1/settings/:user_id/privacy
 *
 * ```json
 * { "visibility": "friends", "data_sharing": false }
 * ```
 *
 * `visibility` is one of private, public, friends.
 */
pub async fn privacy_put(
    Path(user_id): Path<String>,
    Json(input): Json<PrivacySettingsInput>,
) -> ApiResult<Value> {
    let user_id = parse_user_id(&user_id)?;
    SettingsService::new()
        .await?
        .update_privacy(user_id, input)
        .await?;
    Ok(ApiResponse::success(
        json!({ "message": "Privacy settings updated successfully" }),
    ))
}

/// PUT /api/v1/settings/:user_id/general - Blank or omitted fields keep their value
pub async fn general_put(
    Path(user_id): Path<String>,
    Json(input): Json<GeneralSettingsInput>,
) -> ApiResult<Value> {
    let user_id = parse_user_id(&user_id)?;
    SettingsService::new()
        .await?
        .update_general(user_id, input)
        .await?;
    Ok(ApiResponse::success(
        json!({ "message": "General settings updated successfully" }),
    ))
}
