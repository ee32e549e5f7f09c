use serde::Deserialize;
use serde_json::{Map, Value};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, warn};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::settings::{
    Settings, NOTIFICATION_FREQUENCIES, PROFILE_VISIBILITIES, SETTINGS_COLUMNS,
};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),
    #[error("Settings not found")]
    NotFound,
    #[error("Invalid {field}: '{value}' (expected one of: {allowed})")]
    InvalidValue {
        field: &'static str,
        value: String,
        allowed: String,
    },
}

/// Full replacement of the user-editable settings fields
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSettingsInput {
    pub timezone: String,
    pub language: String,
    pub theme: String,
    pub email_notifications_enabled: bool,
    pub push_notifications_enabled: bool,
    pub notification_frequency: String,
    pub profile_visibility: String,
    pub data_sharing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettingsInput {
    pub email_enabled: bool,
    pub push_enabled: bool,
    pub frequency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrivacySettingsInput {
    pub visibility: String,
    pub data_sharing: bool,
}

/// Blank or absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralSettingsInput {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

impl GeneralSettingsInput {
    fn normalized(self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            timezone: keep(self.timezone),
            language: keep(self.language),
            theme: keep(self.theme),
        }
    }

    fn is_empty(&self) -> bool {
        self.timezone.is_none() && self.language.is_none() && self.theme.is_none()
    }
}

pub struct SettingsService {
    pool: PgPool,
}

impl SettingsService {
    pub async fn new() -> Result<Self, SettingsError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self::with_pool(pool))
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_user_id(&self, user_id: i64) -> Result<Settings, SettingsError> {
        debug!("Fetching settings by user ID: {}", user_id);

        sqlx::query_as::<_, Settings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM settings WHERE user_id = $1 AND deleted_at IS NULL"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            warn!("Settings not found for user: {}", user_id);
            SettingsError::NotFound
        })
    }

    pub async fn update(
        &self,
        user_id: i64,
        input: UpdateSettingsInput,
    ) -> Result<Settings, SettingsError> {
        info!("Updating settings for user: {}", user_id);

        validate_frequency(&input.notification_frequency)?;
        validate_visibility(&input.profile_visibility)?;

        sqlx::query_as::<_, Settings>(&format!(
            "UPDATE settings SET
                timezone = $2, language = $3, theme = $4,
                email_notifications_enabled = $5, push_notifications_enabled = $6,
                notification_frequency = $7, profile_visibility = $8, data_sharing = $9,
                updated_at = NOW()
             WHERE user_id = $1 AND deleted_at IS NULL
             RETURNING {SETTINGS_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&input.timezone)
        .bind(&input.language)
        .bind(&input.theme)
        .bind(input.email_notifications_enabled)
        .bind(input.push_notifications_enabled)
        .bind(&input.notification_frequency)
        .bind(&input.profile_visibility)
        .bind(input.data_sharing)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            warn!("No settings found to update for user: {}", user_id);
            SettingsError::NotFound
        })
    }

    pub async fn update_notifications(
        &self,
        user_id: i64,
        input: NotificationSettingsInput,
    ) -> Result<(), SettingsError> {
        info!(
            "Updating notification settings for user {}: email={} push={} frequency={}",
            user_id, input.email_enabled, input.push_enabled, input.frequency
        );
        validate_frequency(&input.frequency)?;

        let result = sqlx::query(
            "UPDATE settings SET
                email_notifications_enabled = $2,
                push_notifications_enabled = $3,
                notification_frequency = $4,
                updated_at = NOW()
             WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(input.email_enabled)
        .bind(input.push_enabled)
        .bind(&input.frequency)
        .execute(&self.pool)
        .await?;

        require_row(result.rows_affected())
    }

    pub async fn update_privacy(
        &self,
        user_id: i64,
        input: PrivacySettingsInput,
    ) -> Result<(), SettingsError> {
        info!(
            "Updating privacy settings for user {}: visibility={} data_sharing={}",
            user_id, input.visibility, input.data_sharing
        );
        validate_visibility(&input.visibility)?;

        let result = sqlx::query(
            "UPDATE settings SET profile_visibility = $2, data_sharing = $3, updated_at = NOW()
             WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(&input.visibility)
        .bind(input.data_sharing)
        .execute(&self.pool)
        .await?;

        require_row(result.rows_affected())
    }

    pub async fn update_general(
        &self,
        user_id: i64,
        input: GeneralSettingsInput,
    ) -> Result<(), SettingsError> {
        let input = input.normalized();
        if input.is_empty() {
            debug!("No general settings to update for user: {}", user_id);
            return Ok(());
        }
        info!("Updating general settings for user: {}", user_id);

        let result = sqlx::query(
            "UPDATE settings SET
                timezone = COALESCE($2, timezone),
                language = COALESCE($3, language),
                theme = COALESCE($4, theme),
                updated_at = NOW()
             WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(input.timezone)
        .bind(input.language)
        .bind(input.theme)
        .execute(&self.pool)
        .await?;

        require_row(result.rows_affected())
    }

    /// Replace the whole custom settings object
    pub async fn update_custom(
        &self,
        user_id: i64,
        custom: Map<String, Value>,
    ) -> Result<(), SettingsError> {
        info!("Updating custom settings for user {} ({} keys)", user_id, custom.len());

        let result = sqlx::query(
            "UPDATE settings SET custom_settings = $2, updated_at = NOW()
             WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .bind(Value::Object(custom))
        .execute(&self.pool)
        .await?;

        require_row(result.rows_affected())
    }

    /// Look up one custom setting; `None` when the key is unset
    pub async fn get_custom(&self, user_id: i64, key: &str) -> Result<Option<Value>, SettingsError> {
        debug!("Fetching custom setting '{}' for user {}", key, user_id);
        let settings = self.get_by_user_id(user_id).await?;
        Ok(custom_value(&settings.custom_settings, key))
    }
}

/// Insert the default settings row inside the user-creation transaction
pub(crate) async fn create_default(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
) -> Result<Settings, sqlx::Error> {
    info!("Creating default settings for user: {}", user_id);

    sqlx::query_as::<_, Settings>(&format!(
        "INSERT INTO settings (user_id) VALUES ($1) RETURNING {SETTINGS_COLUMNS}"
    ))
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
}

pub(crate) async fn soft_delete_for_user(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE settings SET deleted_at = NOW(), updated_at = NOW()
         WHERE user_id = $1 AND deleted_at IS NULL",
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

fn custom_value(custom: &Value, key: &str) -> Option<Value> {
    custom.get(key).cloned()
}

fn require_row(rows_affected: u64) -> Result<(), SettingsError> {
    if rows_affected == 0 {
        return Err(SettingsError::NotFound);
    }
    Ok(())
}

fn validate_frequency(frequency: &str) -> Result<(), SettingsError> {
    validate_choice("notification_frequency", frequency, NOTIFICATION_FREQUENCIES)
}

fn validate_visibility(visibility: &str) -> Result<(), SettingsError> {
    validate_choice("profile_visibility", visibility, PROFILE_VISIBILITIES)
}

fn validate_choice(
    field: &'static str,
    value: &str,
    allowed: &[&str],
) -> Result<(), SettingsError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(SettingsError::InvalidValue {
        field,
        value: value.to_string(),
        allowed: allowed.join(", "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_known_frequencies_and_visibilities() {
        for f in ["daily", "weekly", "monthly"] {
            assert!(validate_frequency(f).is_ok());
        }
        for v in ["private", "public", "friends"] {
            assert!(validate_visibility(v).is_ok());
        }
    }

    #[test]
    fn rejects_unknown_choice_with_allowed_list() {
        let err = validate_frequency("hourly").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid notification_frequency: 'hourly' (expected one of: daily, weekly, monthly)"
        );
        assert!(validate_visibility("PUBLIC").is_err());
    }

    #[test]
    fn general_input_drops_blank_fields() {
        let input = GeneralSettingsInput {
            timezone: Some("Europe/Paris".to_string()),
            language: Some("  ".to_string()),
            theme: None,
        }
        .normalized();

        assert_eq!(input.timezone.as_deref(), Some("Europe/Paris"));
        assert!(input.language.is_none());
        assert!(!input.is_empty());

        let blank: GeneralSettingsInput = serde_json::from_value(json!({ "theme": "" })).unwrap();
        assert!(blank.normalized().is_empty());
    }

    #[test]
    fn custom_value_lookup() {
        let custom = json!({ "dashboard": { "layout": "grid" }, "beta": true });
        assert_eq!(custom_value(&custom, "beta"), Some(json!(true)));
        assert_eq!(custom_value(&custom, "dashboard"), Some(json!({ "layout": "grid" })));
        assert_eq!(custom_value(&custom, "missing"), None);
    }

    #[test]
    fn require_row_maps_zero_to_not_found() {
        assert!(matches!(require_row(0), Err(SettingsError::NotFound)));
        assert!(require_row(1).is_ok());
    }
}
