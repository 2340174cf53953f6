//! Conversions between request/response DTOs and domain entities.
//!
//! Localized fields are flattened into [`NewTranslation`] rows on the way in
//! and reassembled from [`Translation`] rows on the way out. List-valued
//! translations are stored as JSON array strings.
//!
//! [`NewTranslation`]: crate::domain::entities::NewTranslation

pub mod project_mapper;
pub mod team_member_mapper;

use std::collections::HashMap;

use serde_json::json;
use tracing::warn;

use crate::api::dto::{LocalizedList, LocalizedText, OptionalLocalizedList};
use crate::domain::entities::{
    EntityType, LanguageCode, NewTranslation, Translation, TranslationField,
};
use crate::error::AppError;

/// Read-side view over the translations of one entity.
pub(crate) struct Translations<'a> {
    rows: &'a [Translation],
}

impl<'a> Translations<'a> {
    pub(crate) fn new(rows: &'a [Translation]) -> Self {
        Self { rows }
    }

    fn find(&self, field: TranslationField, language: LanguageCode) -> Option<&'a str> {
        self.rows
            .iter()
            .find(|t| t.field == field && t.language == language)
            .map(|t| t.value.as_str())
    }

    /// Missing translations read as `""`.
    pub(crate) fn text(&self, field: TranslationField) -> LocalizedText {
        let get = |language| self.find(field, language).unwrap_or_default().to_string();
        LocalizedText {
            en: get(LanguageCode::En),
            ru: get(LanguageCode::Ru),
            kz: get(LanguageCode::Kz),
        }
    }

    /// Missing translations read as `[]`.
    pub(crate) fn list(&self, field: TranslationField) -> LocalizedList {
        let get = |language| {
            self.find(field, language)
                .map(|raw| parse_list(raw, field, language))
                .unwrap_or_default()
        };
        LocalizedList {
            en: get(LanguageCode::En),
            ru: get(LanguageCode::Ru),
            kz: get(LanguageCode::Kz),
        }
    }

    /// Missing or empty translations read as `null`.
    pub(crate) fn optional_list(&self, field: TranslationField) -> OptionalLocalizedList {
        let get = |language| {
            self.find(field, language)
                .filter(|raw| !raw.trim().is_empty())
                .map(|raw| parse_list(raw, field, language))
        };
        OptionalLocalizedList {
            en: get(LanguageCode::En),
            ru: get(LanguageCode::Ru),
            kz: get(LanguageCode::Kz),
        }
    }
}

fn parse_list(raw: &str, field: TranslationField, language: LanguageCode) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(%field, %language, error = %e, "Stored list translation is not a JSON array");
        Vec::new()
    })
}

/// Appends one row per language for a text field.
pub(crate) fn push_text(out: &mut Vec<NewTranslation>, field: TranslationField, text: &LocalizedText) {
    for language in LanguageCode::ALL {
        out.push(NewTranslation::new(field, language, text.get(language)));
    }
}

/// Appends one JSON-array row per language for a list field.
pub(crate) fn push_list(
    out: &mut Vec<NewTranslation>,
    field: TranslationField,
    language: LanguageCode,
    items: &[String],
) -> Result<(), AppError> {
    let encoded = serde_json::to_string(items).map_err(|e| {
        AppError::internal(
            "Failed to encode list translation",
            json!({ "field": field.as_str(), "reason": e.to_string() }),
        )
    })?;
    out.push(NewTranslation::new(field, language, encoded));
    Ok(())
}

/// Groups a batch of translations by owning entity id.
pub(crate) fn group_by_entity(rows: Vec<Translation>) -> HashMap<i64, Vec<Translation>> {
    let mut grouped: HashMap<i64, Vec<Translation>> = HashMap::new();
    for row in rows {
        grouped.entry(row.entity_id).or_default().push(row);
    }
    grouped
}

/// Views freshly written rows as stored translations of `entity_id`.
pub(crate) fn materialize(
    entity_type: EntityType,
    entity_id: i64,
    rows: Vec<NewTranslation>,
) -> Vec<Translation> {
    rows.into_iter()
        .map(|row| Translation {
            id: 0,
            entity_type,
            entity_id,
            field: row.field,
            language: row.language,
            value: row.value,
        })
        .collect()
}
