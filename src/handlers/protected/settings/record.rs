use axum::{extract::Path, Json};

use crate::database::models::Settings;
use crate::handlers::parse_user_id;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::settings_service::{SettingsService, UpdateSettingsInput};

/// GET /api/v1/settings/:user_id
pub async fn settings_get(Path(user_id): Path<String>) -> ApiResult<Settings> {
    let user_id = parse_user_id(&user_id)?;
    let settings = SettingsService::new().await?.get_by_user_id(user_id).await?;
    Ok(ApiResponse::success(settings))
}

/// PUT /api/v1/settings/:user_id - Replace every general, notification and privacy field
///
/// Custom settings are untouched; use the /custom endpoint for those.
pub async fn settings_put(
    Path(user_id): Path<String>,
    Json(input): Json<UpdateSettingsInput>,
) -> ApiResult<Settings> {
    let user_id = parse_user_id(&user_id)?;
    let settings = SettingsService::new().await?.update(user_id, input).await?;
    Ok(ApiResponse::success(settings))
}
