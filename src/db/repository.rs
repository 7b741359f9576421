//! Database repository for all data operations.
//!
//! Uses prepared statements; the flows issue at most a handful of sequential
//! queries per request.

use chrono::{Duration, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{ActionType, LogEntry, Session, Tag, TagPayload, User};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== USER OPERATIONS ====================

    /// Create a new user with an already-hashed password.
    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO users (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(email)
            .bind(password_hash)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(User {
            id,
            email: email.to_string(),
            created_at: now,
        })
    }

    /// Look up a user by email, returning the stored password hash alongside.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<(User, String)>, AppError> {
        let row = sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| {
            (
                User {
                    id: row.get("id"),
                    email: row.get("email"),
                    created_at: row.get("created_at"),
                },
                row.get("password_hash"),
            )
        }))
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT id, email, created_at FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    // ==================== SESSION OPERATIONS ====================

    /// Create a session for a user.
    pub async fn create_session(&self, user_id: &str, ttl_hours: i64) -> Result<Session, AppError> {
        let token = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let expires_at = (now + Duration::hours(ttl_hours)).to_rfc3339();
        let created_at = now.to_rfc3339();

        sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&token)
        .bind(user_id)
        .bind(&created_at)
        .bind(&expires_at)
        .execute(&self.pool)
        .await?;

        Ok(Session {
            token,
            user_id: user_id.to_string(),
            created_at,
            expires_at,
        })
    }

    /// Resolve a session token. Expired sessions are treated as absent.
    pub async fn get_session(&self, token: &str) -> Result<Option<Session>, AppError> {
        let row = sqlx::query(
            "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let session = match row.as_ref().map(session_from_row) {
            Some(s) => s,
            None => return Ok(None),
        };

        if session.expires_at <= Utc::now().to_rfc3339() {
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Revoke a session. Revoking an unknown token is not an error.
    pub async fn delete_session(&self, token: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ==================== TAG OPERATIONS ====================

    /// Create a new tag owned by a user.
    pub async fn create_tag(
        &self,
        user_id: &str,
        tag_uid: &str,
        payload: &TagPayload,
    ) -> Result<Tag, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO tags (
                id, tag_uid, user_id, asset_id, shipment_id, container_id,
                description, location, created_at, updated_at, last_scanned
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL)"#,
        )
        .bind(&id)
        .bind(tag_uid)
        .bind(user_id)
        .bind(&payload.asset_id)
        .bind(&payload.shipment_id)
        .bind(&payload.container_id)
        .bind(&payload.description)
        .bind(&payload.location)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Tag {
            id,
            tag_uid: tag_uid.to_string(),
            user_id: user_id.to_string(),
            written_data: payload.clone(),
            created_at: now.clone(),
            updated_at: now,
            last_scanned: None,
        })
    }

    /// Get the most recently written tag for a user.
    ///
    /// Creation-time ties are broken by id so repeated calls select the same
    /// row.
    pub async fn latest_tag(&self, user_id: &str) -> Result<Option<Tag>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, tag_uid, user_id, asset_id, shipment_id, container_id,
                      description, location, created_at, updated_at, last_scanned
               FROM tags WHERE user_id = ?
               ORDER BY created_at DESC, id DESC LIMIT 1"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(tag_from_row))
    }

    /// Set a tag's last_scanned marker.
    pub async fn mark_scanned(&self, tag_id: &str, scanned_at: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE tags SET last_scanned = ?, updated_at = ? WHERE id = ?")
            .bind(scanned_at)
            .bind(scanned_at)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Database(format!(
                "Tag {} disappeared during scan",
                tag_id
            )));
        }

        Ok(())
    }

    // ==================== AUDIT LOG OPERATIONS ====================

    /// Append an audit log entry. `payload` is serialized once so the entry
    /// stays a point-in-time snapshot.
    pub async fn append_log(
        &self,
        user_id: &str,
        tag_uid: &str,
        action: ActionType,
        payload: &TagPayload,
    ) -> Result<LogEntry, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let data_json = serde_json::to_string(payload)?;

        sqlx::query(
            "INSERT INTO nfc_logs (id, tag_uid, action_type, data, user_id, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(tag_uid)
        .bind(action.as_str())
        .bind(&data_json)
        .bind(user_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(LogEntry {
            id,
            tag_uid: tag_uid.to_string(),
            action_type: action,
            data: payload.clone(),
            user_id: user_id.to_string(),
            created_at: now,
        })
    }

    /// List the most recent audit log entries for a user, newest first.
    pub async fn list_logs(&self, user_id: &str, limit: i64) -> Result<Vec<LogEntry>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, tag_uid, action_type, data, user_id, created_at
               FROM nfc_logs WHERE user_id = ?
               ORDER BY created_at DESC, id DESC LIMIT ?"#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(log_from_row).collect())
    }
}

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        created_at: row.get("created_at"),
    }
}

fn session_from_row(row: &sqlx::sqlite::SqliteRow) -> Session {
    Session {
        token: row.get("token"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
        expires_at: row.get("expires_at"),
    }
}

fn tag_from_row(row: &sqlx::sqlite::SqliteRow) -> Tag {
    Tag {
        id: row.get("id"),
        tag_uid: row.get("tag_uid"),
        user_id: row.get("user_id"),
        written_data: TagPayload {
            asset_id: row.get("asset_id"),
            shipment_id: row.get("shipment_id"),
            container_id: row.get("container_id"),
            description: row.get("description"),
            location: row.get("location"),
        },
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        last_scanned: row.get("last_scanned"),
    }
}

fn log_from_row(row: &sqlx::sqlite::SqliteRow) -> LogEntry {
    let action: String = row.get("action_type");
    let data_str: Option<String> = row.get("data");
    LogEntry {
        id: row.get("id"),
        tag_uid: row.get("tag_uid"),
        action_type: ActionType::from_str(&action).unwrap_or(ActionType::Read),
        data: data_str
            .map(|s| serde_json::from_str(&s).unwrap_or_default())
            .unwrap_or_default(),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
    }
}
