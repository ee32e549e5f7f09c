use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Settings {
    pub id: i64,
    pub user_id: i64,

    // General
    pub timezone: String,
    pub language: String,
    pub theme: String,

    // Notifications
    pub email_notifications_enabled: bool,
    pub push_notifications_enabled: bool,
    pub notification_frequency: String,

    // Privacy
    pub profile_visibility: String,
    pub data_sharing: bool,

    /// Free-form application-specific settings (JSON object)
    pub custom_settings: Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

pub const SETTINGS_COLUMNS: &str = "id, user_id, timezone, language, theme, \
    email_notifications_enabled, push_notifications_enabled, notification_frequency, \
    profile_visibility, data_sharing, custom_settings, created_at, updated_at, deleted_at";

pub const NOTIFICATION_FREQUENCIES: &[&str] = &["daily", "weekly", "monthly"];
pub const PROFILE_VISIBILITIES: &[&str] = &["private", "public", "friends"];
