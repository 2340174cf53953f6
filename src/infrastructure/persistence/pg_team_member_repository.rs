//! PostgreSQL implementation of team member repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use super::pg_translation_repository::{delete_translations, insert_translations};
use crate::domain::entities::{EntityType, NewTeamMember, NewTranslation, TeamMember};
use crate::domain::pagination::{Page, PageRequest, TeamMemberSort};
use crate::domain::repositories::TeamMemberRepository;
use crate::error::AppError;

const COLUMNS: &str =
    "id, name, image, expertise, email, linkedin, github, scholar, created_at, updated_at";

#[derive(Debug, FromRow)]
struct TeamMemberRow {
    id: i64,
    name: String,
    image: Option<String>,
    expertise: Vec<String>,
    email: Option<String>,
    linkedin: Option<String>,
    github: Option<String>,
    scholar: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TeamMemberRow> for TeamMember {
    fn from(row: TeamMemberRow) -> Self {
        TeamMember {
            id: row.id,
            name: row.name,
            image: row.image,
            expertise: row.expertise,
            email: row.email,
            linkedin: row.linkedin,
            github: row.github,
            scholar: row.scholar,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgTeamMemberRepository {
    pool: Arc<PgPool>,
}

impl PgTeamMemberRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamMemberRepository for PgTeamMemberRepository {
    async fn create(
        &self,
        member: NewTeamMember,
        translations: Vec<NewTranslation>,
    ) -> Result<TeamMember, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TeamMemberRow>(&format!(
            r#"
            INSERT INTO team_members (name, image, expertise, email, linkedin, github, scholar)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&member.name)
        .bind(&member.image)
        .bind(&member.expertise)
        .bind(&member.email)
        .bind(&member.linkedin)
        .bind(&member.github)
        .bind(&member.scholar)
        .fetch_one(&mut *tx)
        .await?;

        insert_translations(&mut tx, EntityType::TeamMember, row.id, &translations).await?;
        tx.commit().await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TeamMember>, AppError> {
        let row = sqlx::query_as::<_, TeamMemberRow>(&format!(
            "SELECT {COLUMNS} FROM team_members WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list(
        &self,
        request: PageRequest<TeamMemberSort>,
    ) -> Result<Page<TeamMember>, AppError> {
        let sql = format!(
            "SELECT {COLUMNS} FROM team_members ORDER BY {} LIMIT $1 OFFSET $2",
            request.order_by()
        );

        let rows = sqlx::query_as::<_, TeamMemberRow>(&sql)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(Page {
            items: rows.into_iter().map(Into::into).collect(),
            page: request.page,
            size: request.size,
            total: self.count().await?,
        })
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM team_members")
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(count)
    }

    async fn update(
        &self,
        id: i64,
        member: NewTeamMember,
        translations: Vec<NewTranslation>,
    ) -> Result<Option<TeamMember>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TeamMemberRow>(&format!(
            r#"
            UPDATE team_members
            SET name = $2, image = $3, expertise = $4, email = $5,
                linkedin = $6, github = $7, scholar = $8, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&member.name)
        .bind(&member.image)
        .bind(&member.expertise)
        .bind(&member.email)
        .bind(&member.linkedin)
        .bind(&member.github)
        .bind(&member.scholar)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        delete_translations(&mut tx, EntityType::TeamMember, id).await?;
        insert_translations(&mut tx, EntityType::TeamMember, id, &translations).await?;
        tx.commit().await?;

        Ok(Some(row.into()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        delete_translations(&mut tx, EntityType::TeamMember, id).await?;
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
