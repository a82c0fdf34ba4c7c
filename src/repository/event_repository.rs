use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::Event,
    error::{AppError, Result},
    repository::{parse_id, EventRepository},
};

#[derive(FromRow)]
struct EventRow {
    id: String,
    title: String,
    description: String,
    date: NaiveDate,
    location: String,
    image: Option<String>,
    registration_link: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteEventRepository {
    pool: SqlitePool,
}

impl SqliteEventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_event(row: EventRow) -> Result<Event> {
        Ok(Event {
            id: parse_id(&row.id)?,
            title: row.title,
            description: row.description,
            date: row.date,
            location: row.location,
            image: row.image,
            registration_link: row.registration_link,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepository {
    async fn create(&self, event: Event) -> Result<Event> {
        sqlx::query(
            r#"
            INSERT INTO events (
                id, title, description, date, location, image,
                registration_link, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(event.id.to_string())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.image)
        .bind(&event.registration_link)
        .bind(event.created_at.naive_utc())
        .bind(event.updated_at.naive_utc())
        .execute(&self.pool)
        .await?;

        self.find_by_id(event.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created event".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, date, location, image,
                   registration_link, created_at, updated_at
            FROM events
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_event).transpose()
    }

    async fn list(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, title, description, date, location, image,
                   registration_link, created_at, updated_at
            FROM events
            ORDER BY created_at ASC, rowid ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_event)
            .collect()
    }

    async fn update(&self, id: Uuid, event: Event) -> Result<Event> {
        let now = Utc::now().naive_utc();

        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = ?, description = ?, date = ?, location = ?,
                image = ?, registration_link = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.image)
        .bind(&event.registration_link)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated event".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".to_string()));
        }

        Ok(())
    }
}
