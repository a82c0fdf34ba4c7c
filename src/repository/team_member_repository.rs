use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::{
    domain::TeamMember,
    error::{AppError, Result},
    repository::{parse_id, TeamMemberRepository},
};

#[derive(FromRow)]
struct TeamMemberRow {
    id: String,
    name: String,
    role: String,
    bio: Option<String>,
    image: Option<String>,
    social_links: Option<String>,
    display_order: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

pub struct SqliteTeamMemberRepository {
    pool: SqlitePool,
}

impl SqliteTeamMemberRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_member(row: TeamMemberRow) -> Result<TeamMember> {
        Ok(TeamMember {
            id: parse_id(&row.id)?,
            name: row.name,
            role: row.role,
            bio: row.bio,
            image: row.image,
            social_links: row.social_links,
            order: row.display_order,
            created_at: DateTime::from_naive_utc_and_offset(row.created_at, Utc),
            updated_at: DateTime::from_naive_utc_and_offset(row.updated_at, Utc),
        })
    }
}

#[async_trait]
impl TeamMemberRepository for SqliteTeamMemberRepository {
    async fn create(&self, member: TeamMember) -> Result<TeamMember> {
        sqlx::query(
            r#"
            INSERT INTO team_members (
                id, name, role, bio, image, social_links,
                display_order, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(member.id.to_string())
        .bind(&member.name)
        .bind(&member.role)
        .bind(&member.bio)
        .bind(&member.image)
        .bind(&member.social_links)
        .bind(member.order)
        .bind(member.created_at.naive_utc())
        .bind(member.updated_at.naive_utc())
        .execute(&self.pool)
        .await?;

        self.find_by_id(member.id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve created team member".to_string())
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamMember>> {
        let row = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            SELECT id, name, role, bio, image, social_links,
                   display_order, created_at, updated_at
            FROM team_members
            WHERE id = ?
            "#
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_member).transpose()
    }

    async fn list(&self) -> Result<Vec<TeamMember>> {
        let rows = sqlx::query_as::<_, TeamMemberRow>(
            r#"
            SELECT id, name, role, bio, image, social_links,
                   display_order, created_at, updated_at
            FROM team_members
            ORDER BY created_at ASC, rowid ASC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(Self::row_to_member)
            .collect()
    }

    async fn update(&self, id: Uuid, member: TeamMember) -> Result<TeamMember> {
        let result = sqlx::query(
            r#"
            UPDATE team_members
            SET name = ?, role = ?, bio = ?, image = ?, social_links = ?,
                display_order = ?, updated_at = ?
            WHERE id = ?
            "#
        )
        .bind(&member.name)
        .bind(&member.role)
        .bind(&member.bio)
        .bind(&member.image)
        .bind(&member.social_links)
        .bind(member.order)
        .bind(Utc::now().naive_utc())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Team member not found".to_string()));
        }

        self.find_by_id(id).await?.ok_or_else(|| {
            AppError::Database("Failed to retrieve updated team member".to_string())
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Team member not found".to_string()));
        }

        Ok(())
    }
}
