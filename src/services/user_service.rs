use serde::Deserialize;
use sqlx::PgPool;
use tracing::{debug, error, info, warn};

use crate::auth::{cipher, CipherError};
use crate::config::{self, PasswordConfig};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::user::{User, DEFAULT_ROLE, USER_COLUMNS};
use crate::services::settings_service;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),
    #[error("Credential encryption error: {0}")]
    Cipher(#[from] CipherError),
    #[error("User not found")]
    NotFound,
    #[error("User with this email already exists")]
    AlreadyExists(String),
    #[error("Invalid password: {0}")]
    InvalidPassword(String),
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Account is deactivated")]
    AccountInactive,
    #[error("Current password is incorrect")]
    IncorrectPassword,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserInput {
    pub email: Option<String>,
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

pub struct UserService {
    pool: PgPool,
    password_policy: PasswordConfig,
}

impl UserService {
    pub async fn new() -> Result<Self, UserError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self::with_pool(pool))
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self {
            pool,
            password_policy: config::config().password.clone(),
        }
    }

    /// Register a user together with their default settings
    pub async fn create_user(&self, input: CreateUserInput) -> Result<User, UserError> {
        info!("Creating new user: {}", input.email);

        validate_email_format(&input.email)?;
        validate_password(&self.password_policy, &input.password)?;

        if self.email_exists(&input.email).await? {
            warn!("User already exists: {}", input.email);
            return Err(UserError::AlreadyExists(input.email));
        }

        let role = input
            .role
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());
        let encrypted = cipher::encrypt(&config::encryption_key(), &input.password)?;

        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, first_name, last_name, password, role, is_active)
             VALUES ($1, $2, $3, $4, $5, TRUE)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&input.email)
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&encrypted)
        .bind(&role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, &input.email))?;

        // Dropping the transaction on error rolls the user back too
        if let Err(e) = settings_service::create_default(&mut tx, user.id).await {
            error!("Failed to create default settings for user {}: {}", user.id, e);
            return Err(e.into());
        }

        tx.commit().await?;

        info!("Created user {} ({})", user.id, user.email);
        Ok(user.redacted())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<User, UserError> {
        debug!("Fetching user by ID: {}", id);
        self.find_by_id(id).await.map(User::redacted)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, UserError> {
        debug!("Fetching user by email: {}", email);
        self.find_by_email(email).await.map(User::redacted)
    }

    pub async fn update(&self, id: i64, input: UpdateUserInput) -> Result<User, UserError> {
        info!("Updating user: {}", id);

        if let Some(email) = &input.email {
            validate_email_format(email)?;
        }

        let email_for_error = input.email.clone().unwrap_or_default();
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                role = COALESCE($5, role),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(input.email)
        .bind(input.first_name)
        .bind(input.last_name)
        .bind(input.role)
        .bind(input.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, &email_for_error))?;

        match user {
            Some(user) => Ok(user.redacted()),
            None => {
                warn!("User not found for update: {}", id);
                Err(UserError::NotFound)
            }
        }
    }

    /// Soft-delete the user and their settings in one transaction
    pub async fn delete(&self, id: i64) -> Result<(), UserError> {
        info!("Deleting user: {}", id);

        let mut tx = self.pool.begin().await?;

        settings_service::soft_delete_for_user(&mut tx, id).await?;

        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            warn!("User not found for delete: {}", id);
            return Err(UserError::NotFound);
        }

        tx.commit().await?;
        info!("Successfully deleted user: {}", id);
        Ok(())
    }

    /// Change a password after confirming the current one
    pub async fn update_password(
        &self,
        id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), UserError> {
        let user = self.find_by_id(id).await?;
        let encrypted = prepare_password_change(
            &user,
            &config::encryption_key(),
            &self.password_policy,
            current_password,
            new_password,
        )?;

        sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .bind(&encrypted)
            .execute(&self.pool)
            .await?;

        info!("Password updated for user: {}", id);
        Ok(())
    }

    pub async fn activate(&self, id: i64) -> Result<(), UserError> {
        self.set_active(id, true).await
    }

    /// Already-issued tokens stay valid until they expire
    pub async fn deactivate(&self, id: i64) -> Result<(), UserError> {
        self.set_active(id, false).await
    }

    /// Check a login attempt, returning the user on success
    pub async fn validate_credentials(&self, email: &str, password: &str) -> Result<User, UserError> {
        let user = match self.find_by_email(email).await {
            Ok(user) => user,
            Err(UserError::NotFound) => return Err(UserError::InvalidCredentials),
            Err(e) => return Err(e),
        };

        check_credentials(user, &config::encryption_key(), password)
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<(), UserError> {
        info!("Setting user {} active={}", id, active);

        let result = sqlx::query(
            "UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(active)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound);
        }
        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, UserError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM users WHERE email = $1 AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    async fn find_by_id(&self, id: i64) -> Result<User, UserError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            warn!("User not found: {}", id);
            UserError::NotFound
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<User, UserError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            warn!("User not found: {}", email);
            UserError::NotFound
        })
    }
}

fn map_unique_violation(err: sqlx::Error, email: &str) -> UserError {
    let is_unique = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false);

    if is_unique {
        UserError::AlreadyExists(email.to_string())
    } else {
        UserError::Database(err)
    }
}

/// Compare a login attempt against a stored user under `encoded_key`.
///
/// A stored payload that no longer decodes counts as a credential mismatch;
/// a misconfigured key is still an error for the operator.
pub fn check_credentials(user: User, encoded_key: &str, password: &str) -> Result<User, UserError> {
    if !stored_password_matches(&user, encoded_key, password)? {
        warn!("Invalid credentials for: {}", user.email);
        return Err(UserError::InvalidCredentials);
    }

    if !user.is_active {
        warn!("Login attempt for deactivated account: {}", user.email);
        return Err(UserError::AccountInactive);
    }

    Ok(user.redacted())
}

/// Verify the current password and encrypt the new one, returning the payload to store
pub fn prepare_password_change(
    user: &User,
    encoded_key: &str,
    policy: &PasswordConfig,
    current_password: &str,
    new_password: &str,
) -> Result<String, UserError> {
    if !stored_password_matches(user, encoded_key, current_password)? {
        warn!("Password change rejected for user {}: current password mismatch", user.id);
        return Err(UserError::IncorrectPassword);
    }

    validate_password(policy, new_password)?;
    Ok(cipher::encrypt(encoded_key, new_password)?)
}

fn stored_password_matches(user: &User, encoded_key: &str, candidate: &str) -> Result<bool, UserError> {
    match cipher::decrypt(encoded_key, &user.password) {
        Ok(stored) => Ok(stored == candidate),
        Err(CipherError::MalformedPayload) => {
            error!("Stored password for user {} is not a valid payload", user.id);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// Enforce length bounds plus at least one digit and one uppercase letter.
///
/// Length is measured in UTF-8 bytes, so the 72 limit holds for the stored bytes.
pub fn validate_password(policy: &PasswordConfig, password: &str) -> Result<(), UserError> {
    let length = password.len();

    if length < policy.min_length {
        return Err(UserError::InvalidPassword(format!(
            "password must be at least {} characters long",
            policy.min_length
        )));
    }
    if length > policy.max_length {
        return Err(UserError::InvalidPassword(format!(
            "password must not exceed {} characters",
            policy.max_length
        )));
    }
    if !password.chars().any(char::is_numeric) {
        return Err(UserError::InvalidPassword(
            "password must contain at least one number".to_string(),
        ));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(UserError::InvalidPassword(
            "password must contain at least one uppercase letter".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_email_format(email: &str) -> Result<(), UserError> {
    if email.is_empty() {
        return Err(UserError::InvalidEmail("Email cannot be empty".to_string()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
        return Err(UserError::InvalidEmail("Invalid email format".to_string()));
    }
    if parts[1].starts_with('.') || parts[1].ends_with('.') {
        return Err(UserError::InvalidEmail("Invalid email format".to_string()));
    }

    Ok(())
}
