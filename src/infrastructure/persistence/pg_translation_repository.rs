//! PostgreSQL implementation of translation reads, plus the write helpers used
//! by aggregate repositories inside their transactions.

use async_trait::async_trait;
use sqlx::{FromRow, PgConnection, PgPool};
use std::sync::Arc;

use crate::domain::entities::{EntityType, NewTranslation, Translation};
use crate::domain::repositories::TranslationRepository;
use crate::error::AppError;

#[derive(Debug, FromRow)]
struct TranslationRow {
    id: i64,
    entity_type: String,
    entity_id: i64,
    field_name: String,
    language_code: String,
    value: String,
}

impl TryFrom<TranslationRow> for Translation {
    type Error = AppError;

    fn try_from(row: TranslationRow) -> Result<Self, Self::Error> {
        let corrupt = |e: String| {
            AppError::internal(
                "Corrupt translation row",
                serde_json::json!({ "id": row.id, "reason": e }),
            )
        };

        Ok(Translation {
            id: row.id,
            entity_type: row.entity_type.parse().map_err(corrupt)?,
            entity_id: row.entity_id,
            field: row.field_name.parse().map_err(corrupt)?,
            language: row.language_code.parse().map_err(corrupt)?,
            value: row.value,
        })
    }
}

pub struct PgTranslationRepository {
    pool: Arc<PgPool>,
}

impl PgTranslationRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TranslationRepository for PgTranslationRepository {
    async fn find_by_entity(
        &self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> Result<Vec<Translation>, AppError> {
        let rows = sqlx::query_as::<_, TranslationRow>(
            r#"
            SELECT id, entity_type, entity_id, field_name, language_code, value
            FROM translations
            WHERE entity_type = $1 AND entity_id = $2
            ORDER BY id
            "#,
        )
        .bind(entity_type.as_str())
        .bind(entity_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Translation::try_from).collect()
    }

    async fn find_by_entities(
        &self,
        entity_type: EntityType,
        entity_ids: &[i64],
    ) -> Result<Vec<Translation>, AppError> {
        if entity_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, TranslationRow>(
            r#"
            SELECT id, entity_type, entity_id, field_name, language_code, value
            FROM translations
            WHERE entity_type = $1 AND entity_id = ANY($2)
            ORDER BY entity_id, id
            "#,
        )
        .bind(entity_type.as_str())
        .bind(entity_ids)
        .fetch_all(self.pool.as_ref())
        .await?;

        rows.into_iter().map(Translation::try_from).collect()
    }
}

/// Inserts translations for one entity with a single `UNNEST` statement.
pub(crate) async fn insert_translations(
    conn: &mut PgConnection,
    entity_type: EntityType,
    entity_id: i64,
    translations: &[NewTranslation],
) -> Result<(), AppError> {
    if translations.is_empty() {
        return Ok(());
    }

    let fields: Vec<&str> = translations.iter().map(|t| t.field.as_str()).collect();
    let languages: Vec<&str> = translations.iter().map(|t| t.language.as_str()).collect();
    let values: Vec<&str> = translations.iter().map(|t| t.value.as_str()).collect();

    sqlx::query(
        r#"
        INSERT INTO translations (entity_type, entity_id, field_name, language_code, value)
        SELECT $1, $2, f, l, v
        FROM UNNEST($3::text[], $4::text[], $5::text[]) AS t(f, l, v)
        "#,
    )
    .bind(entity_type.as_str())
    .bind(entity_id)
    .bind(&fields)
    .bind(&languages)
    .bind(&values)
    .execute(conn)
    .await?;

    Ok(())
}

pub(crate) async fn delete_translations(
    conn: &mut PgConnection,
    entity_type: EntityType,
    entity_id: i64,
) -> Result<u64, AppError> {
    let result = sqlx::query("DELETE FROM translations WHERE entity_type = $1 AND entity_id = $2")
        .bind(entity_type.as_str())
        .bind(entity_id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}
