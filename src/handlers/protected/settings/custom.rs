use axum::{extract::Path, Json};
use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::handlers::parse_user_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::SettingsService;

/// PUT /api/v1/settings/:user_id/custom - Replace the whole custom settings object
///
/// The body must be a JSON object; its keys become the new custom settings.
pub async fn custom_put(
    Path(user_id): Path<String>,
    Json(custom): Json<Map<String, Value>>,
) -> ApiResult<Value> {
    let user_id = parse_user_id(&user_id)?;
    SettingsService::new()
        .await?
        .update_custom(user_id, custom)
        .await?;
    Ok(ApiResponse::success(
        json!({ "message": "Custom settings updated successfully" }),
    ))
}

/// GET /api/v1/settings/:user_id/custom/:key
///
/// ```json
/// { "success": true, "data": { "key": "dashboard", "value": { "layout": "grid" } } }
/// ```
pub async fn custom_get(Path((user_id, key)): Path<(String, String)>) -> ApiResult<Value> {
    let user_id = parse_user_id(&user_id)?;
    let value = SettingsService::new()
        .await?
        .get_custom(user_id, &key)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Custom setting '{}' not found", key)))?;

    Ok(ApiResponse::success(json!({ "key": key, "value": value })))
}
