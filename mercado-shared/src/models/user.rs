/// User model and database operations
///
/// This module provides the User model and CRUD operations for the
/// `usuarios` table, including the per-user notification preference flags.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE usuarios (
///     id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role VARCHAR(32) NOT NULL DEFAULT 'customer',
///     notify_email BOOLEAN NOT NULL DEFAULT TRUE,
///     notify_sms BOOLEAN NOT NULL DEFAULT FALSE,
///     notify_push BOOLEAN NOT NULL DEFAULT FALSE,
///     push_token VARCHAR(512) NULL,
///     created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
///     last_login_at TIMESTAMP NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

/// Columns selected for every `User` read, kept in one place so the
/// re-reads after INSERT/UPDATE stay in sync with the struct.
const USER_COLUMNS: &str = "id, name, email, password_hash, role, notify_email, notify_sms, \
     notify_push, push_token, created_at, updated_at, last_login_at";

/// User role stored as a plain string in the `role` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular storefront customer
    Customer,

    /// Admin panel user, may mutate the catalog and stock
    Admin,
}

impl UserRole {
    /// Gets the role as its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "customer",
            UserRole::Admin => "admin",
        }
    }

    /// Parses a role from its stored string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(UserRole::Customer),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

/// User account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id (auto-increment)
    pub id: i64,

    /// Display name
    pub name: String,

    /// Email address, unique across all users
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Account role
    pub role: UserRole,

    /// Whether the user wants email notifications
    pub notify_email: bool,

    /// Whether the user wants SMS notifications
    pub notify_sms: bool,

    /// Whether the user wants push notifications
    pub notify_push: bool,

    /// Device token for push delivery (None when push is unregistered)
    pub push_token: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Account role
    pub role: UserRole,
}

/// Partial update of a user's notification preferences
///
/// Only non-None fields are written. `push_token` uses a nested Option so
/// `Some(None)` clears the token while `None` leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateNotificationPrefs {
    /// New email notification flag
    pub notify_email: Option<bool>,

    /// New SMS notification flag
    pub notify_sms: Option<bool>,

    /// New push notification flag
    pub notify_push: Option<bool>,

    /// New push token (use Some(None) to clear)
    pub push_token: Option<Option<String>>,
}

impl UpdateNotificationPrefs {
    /// Whether this update changes anything
    pub fn is_empty(&self) -> bool {
        self.notify_email.is_none()
            && self.notify_sms.is_none()
            && self.notify_push.is_none()
            && self.push_token.is_none()
    }
}

impl User {
    /// Creates a new user and returns the persisted row
    ///
    /// MySQL has no `RETURNING`, so the row is re-read by the id MySQL
    /// assigned. The re-read goes through the same pool the write used.
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint) or
    /// the database is unreachable.
    pub async fn create(pool: &MySqlPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO usuarios (name, email, password_hash, role)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.role)
        .execute(pool)
        .await?;

        let id = result.last_insert_id() as i64;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Finds a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn find_by_id(pool: &MySqlPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM usuarios WHERE id = ?", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email address
    ///
    /// Lookup is case-insensitive under MySQL's default collation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn find_by_email(pool: &MySqlPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM usuarios WHERE email = ?", USER_COLUMNS);

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Updates the last login timestamp for a user
    ///
    /// Called after successful authentication.
    pub async fn update_last_login(pool: &MySqlPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE usuarios SET last_login_at = CURRENT_TIMESTAMP WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Updates a user's notification preferences
    ///
    /// Only the provided flags are written; absent fields keep their stored
    /// value. Returns the persisted row after the write, or None if the
    /// user does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn update_notification_prefs(
        pool: &MySqlPool,
        id: i64,
        data: UpdateNotificationPrefs,
    ) -> Result<Option<Self>, sqlx::Error> {
        if !data.is_empty() {
            let mut query = String::from("UPDATE usuarios SET updated_at = CURRENT_TIMESTAMP");

            if data.notify_email.is_some() {
                query.push_str(", notify_email = ?");
            }
            if data.notify_sms.is_some() {
                query.push_str(", notify_sms = ?");
            }
            if data.notify_push.is_some() {
                query.push_str(", notify_push = ?");
            }
            if data.push_token.is_some() {
                query.push_str(", push_token = ?");
            }
            query.push_str(" WHERE id = ?");

            let mut q = sqlx::query(&query);

            if let Some(notify_email) = data.notify_email {
                q = q.bind(notify_email);
            }
            if let Some(notify_sms) = data.notify_sms {
                q = q.bind(notify_sms);
            }
            if let Some(notify_push) = data.notify_push {
                q = q.bind(notify_push);
            }
            if let Some(push_token) = data.push_token {
                q = q.bind(push_token);
            }

            q.bind(id).execute(pool).await?;
        }

        Self::find_by_id(pool, id).await
    }
}
