//! Repository trait for reading translations.

use crate::domain::entities::{EntityType, Translation};
use crate::error::AppError;
use async_trait::async_trait;

/// Read access to translation rows.
///
/// Writes go through the owning aggregate repository so that an entity and its
/// translations change atomically.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationRepository: Send + Sync {
    /// All translations of one entity.
    async fn find_by_entity(
        &self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> Result<Vec<Translation>, AppError>;

    /// All translations of several entities of the same type in one query.
    ///
    /// Used by list endpoints to avoid one query per row.
    async fn find_by_entities(
        &self,
        entity_type: EntityType,
        entity_ids: &[i64],
    ) -> Result<Vec<Translation>, AppError>;
}
