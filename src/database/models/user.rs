use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Encrypted credential payload; never leaves the service layer
    #[serde(skip)]
    pub password: String,
    pub is_active: bool,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Drop the stored credential before the user leaves the service
    pub fn redacted(mut self) -> Self {
        self.password.clear();
        self
    }
}

/// Columns selected for every user query
pub const USER_COLUMNS: &str =
    "id, email, first_name, last_name, password, is_active, role, created_at, updated_at, deleted_at";

pub const DEFAULT_ROLE: &str = "user";
