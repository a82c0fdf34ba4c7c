use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::error::Result;

/// A bearer token issued to an admin after presenting the admin secret.
/// Only the SHA-256 of the token is stored.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct SessionRow {
    id: String,
    expires_at: NaiveDateTime,
}

pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, token: &str, expires_at: DateTime<Utc>) -> Result<AdminSession> {
        let id = Uuid::new_v4().to_string();
        let token_hash = hash_token(token);
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO admin_sessions (id, token_hash, expires_at, created_at, last_used_at)
            VALUES (?, ?, ?, ?, ?)
            "#
        )
        .bind(&id)
        .bind(&token_hash)
        .bind(expires_at.naive_utc())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(AdminSession { id, expires_at })
    }

    /// Returns the live session for `token`, touching `last_used_at`.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<AdminSession>> {
        let token_hash = hash_token(token);
        let now = Utc::now().naive_utc();

        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, expires_at
            FROM admin_sessions
            WHERE token_hash = ? AND expires_at > ?
            "#
        )
        .bind(&token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("UPDATE admin_sessions SET last_used_at = ? WHERE id = ?")
            .bind(now)
            .bind(&row.id)
            .execute(&self.pool)
            .await?;

        Ok(Some(AdminSession {
            id: row.id,
            expires_at: DateTime::from_naive_utc_and_offset(row.expires_at, Utc),
        }))
    }

    pub async fn delete_by_token(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE token_hash = ?")
            .bind(hash_token(token))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn cleanup_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= ?")
            .bind(Utc::now().naive_utc())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
