use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::ContactMessage,
    error::{AppError, Result},
    repository::{parse_id, ContactMessageRepository},
};

#[derive(FromRow)]
struct ContactMessageRow {
    id: String,
    name: String,
    email: String,
    message: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteContactMessageRepository {
    pool: SqlitePool,
}

impl SqliteContactMessageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_message(row: ContactMessageRow) -> Result<ContactMessage> {
        Ok(ContactMessage {
            id: parse_id(&row.id)?,
            name: row.name,
            email: row.email,
            message: row.message,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl ContactMessageRepository for SqliteContactMessageRepository {
    async fn create(&self, message: ContactMessage) -> Result<ContactMessage> {
        sqlx::query(
            r#"
            INSERT INTO contact_messages (id, name, email, message, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(message.id.to_string())
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.message)
        .bind(message.created_at.naive_utc())
        .bind(message.updated_at.naive_utc())
        .execute(&self.pool)
        .await?;

        self.find_by_id(message.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created contact message".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ContactMessage>> {
        let row = sqlx::query_as::<_, ContactMessageRow>(
            r#"
            SELECT id, name, email, message, created_at, updated_at
            FROM contact_messages
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_message).transpose()
    }

    async fn list(&self) -> Result<Vec<ContactMessage>> {
        let rows = sqlx::query_as::<_, ContactMessageRow>(
            r#"
            SELECT id, name, email, message, created_at, updated_at
            FROM contact_messages
            ORDER BY created_at ASC, rowid ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_message)
            .collect()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Contact message not found".to_string()));
        }

        Ok(())
    }
}
