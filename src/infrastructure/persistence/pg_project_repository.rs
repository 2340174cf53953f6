//! PostgreSQL implementation of project repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use super::pg_translation_repository::{delete_translations, insert_translations};
use crate::domain::entities::{EntityType, NewProject, NewTranslation, Project};
use crate::domain::pagination::{Page, PageRequest, ProjectSort};
use crate::domain::repositories::ProjectRepository;
use crate::error::AppError;

const COLUMNS: &str =
    "id, slug, image, tags, status, start_date, end_date, team, created_at, updated_at";

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: i64,
    slug: String,
    image: Option<String>,
    tags: Vec<String>,
    status: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    team: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = AppError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let status = row.status.parse().map_err(|e: String| {
            AppError::internal(
                "Corrupt project row",
                serde_json::json!({ "id": row.id, "reason": e }),
            )
        })?;

        Ok(Project {
            id: row.id,
            slug: row.slug,
            image: row.image,
            tags: row.tags,
            status,
            start_date: row.start_date,
            end_date: row.end_date,
            team: row.team,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL repository for projects. Project rows and their translations are
/// written in one transaction.
pub struct PgProjectRepository {
    pool: Arc<PgPool>,
}

impl PgProjectRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn create(
        &self,
        project: NewProject,
        translations: Vec<NewTranslation>,
    ) -> Result<Project, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO projects (slug, image, tags, status, start_date, end_date, team)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&project.slug)
        .bind(&project.image)
        .bind(&project.tags)
        .bind(project.status.as_str())
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(&project.team)
        .fetch_one(&mut *tx)
        .await?;

        insert_translations(&mut tx, EntityType::Project, row.id, &translations).await?;
        tx.commit().await?;

        Project::try_from(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Project>, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Project::try_from).transpose()
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {COLUMNS} FROM projects WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Project::try_from).transpose()
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE slug = $1)",
        )
        .bind(slug)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn list(&self, request: PageRequest<ProjectSort>) -> Result<Page<Project>, AppError> {
        // ORDER BY is assembled from whitelisted column names only.
        let sql = format!(
            "SELECT {COLUMNS} FROM projects ORDER BY {} LIMIT $1 OFFSET $2",
            request.order_by()
        );

        let rows = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(self.pool.as_ref())
            .await?;

        let total = self.count().await?;
        let items = rows
            .into_iter()
            .map(Project::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            page: request.page,
            size: request.size,
            total,
        })
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(self.pool.as_ref())
            .await?;
        Ok(count)
    }

    async fn update(
        &self,
        id: i64,
        project: NewProject,
        translations: Vec<NewTranslation>,
    ) -> Result<Option<Project>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET slug = $2, image = $3, tags = $4, status = $5,
                start_date = $6, end_date = $7, team = $8, updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&project.slug)
        .bind(&project.image)
        .bind(&project.tags)
        .bind(project.status.as_str())
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(&project.team)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };

        delete_translations(&mut tx, EntityType::Project, id).await?;
        insert_translations(&mut tx, EntityType::Project, id, &translations).await?;
        tx.commit().await?;

        Project::try_from(row).map(Some)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        delete_translations(&mut tx, EntityType::Project, id).await?;
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
