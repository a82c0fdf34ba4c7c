use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::Registration,
    error::{AppError, Result},
    repository::{parse_id, RegistrationRepository},
};

#[derive(FromRow)]
struct RegistrationRow {
    id: String,
    name: String,
    roll_number: String,
    department: String,
    phone: String,
    event_title: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteRegistrationRepository {
    pool: SqlitePool,
}

impl SqliteRegistrationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_registration(row: RegistrationRow) -> Result<Registration> {
        Ok(Registration {
            id: parse_id(&row.id)?,
            name: row.name,
            roll_number: row.roll_number,
            department: row.department,
            phone: row.phone,
            event_title: row.event_title,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl RegistrationRepository for SqliteRegistrationRepository {
    async fn create(&self, registration: Registration) -> Result<Registration> {
        sqlx::query(
            r#"
            INSERT INTO registrations (
                id, name, roll_number, department, phone, event_title,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(registration.id.to_string())
        .bind(&registration.name)
        .bind(&registration.roll_number)
        .bind(&registration.department)
        .bind(&registration.phone)
        .bind(&registration.event_title)
        .bind(registration.created_at.naive_utc())
        .bind(registration.updated_at.naive_utc())
        .execute(&self.pool)
        .await?;

        self.find_by_id(registration.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created registration".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, name, roll_number, department, phone, event_title,
                   created_at, updated_at
            FROM registrations
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_registration).transpose()
    }

    async fn list(&self) -> Result<Vec<Registration>> {
        let rows = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT id, name, roll_number, department, phone, event_title,
                   created_at, updated_at
            FROM registrations
            ORDER BY created_at ASC, rowid ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_registration)
            .collect()
    }

    async fn count_for_event(&self, event_title: &str) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_title = ?"
        )
        .bind(event_title)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Registration not found".to_string()));
        }

        Ok(())
    }
}
