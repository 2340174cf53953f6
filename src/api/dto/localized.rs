//! Per-language value groups used by project and team member DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::entities::LanguageCode;
use crate::utils::validation::{no_blank_items, not_blank};

/// Text in English, Russian and Kazakh. All three are required on input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct LocalizedText {
    #[validate(custom(function = "not_blank"))]
    pub en: String,
    #[validate(custom(function = "not_blank"))]
    pub ru: String,
    #[validate(custom(function = "not_blank"))]
    pub kz: String,
}

impl LocalizedText {
    pub fn get(&self, language: LanguageCode) -> &str {
        match language {
            LanguageCode::En => &self.en,
            LanguageCode::Ru => &self.ru,
            LanguageCode::Kz => &self.kz,
        }
    }
}

/// A non-empty list per language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct LocalizedList {
    #[validate(length(min = 1, message = "At least one entry is required"))]
    #[validate(custom(function = "no_blank_items"))]
    pub en: Vec<String>,
    #[validate(length(min = 1, message = "At least one entry is required"))]
    #[validate(custom(function = "no_blank_items"))]
    pub ru: Vec<String>,
    #[validate(length(min = 1, message = "At least one entry is required"))]
    #[validate(custom(function = "no_blank_items"))]
    pub kz: Vec<String>,
}

impl LocalizedList {
    pub fn get(&self, language: LanguageCode) -> &[String] {
        match language {
            LanguageCode::En => &self.en,
            LanguageCode::Ru => &self.ru,
            LanguageCode::Kz => &self.kz,
        }
    }
}

/// A list per language where any language may be absent (`null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct OptionalLocalizedList {
    #[serde(default)]
    #[validate(custom(function = "no_blank_items"))]
    pub en: Option<Vec<String>>,
    #[serde(default)]
    #[validate(custom(function = "no_blank_items"))]
    pub ru: Option<Vec<String>>,
    #[serde(default)]
    #[validate(custom(function = "no_blank_items"))]
    pub kz: Option<Vec<String>>,
}

impl OptionalLocalizedList {
    pub fn get(&self, language: LanguageCode) -> Option<&[String]> {
        match language {
            LanguageCode::En => self.en.as_deref(),
            LanguageCode::Ru => self.ru.as_deref(),
            LanguageCode::Kz => self.kz.as_deref(),
        }
    }
}
