//! DTOs for project endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::localized::{LocalizedList, LocalizedText, OptionalLocalizedList};
use crate::utils::validation::{no_blank_items, not_blank};

/// Create or full-replace payload for a project.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRequest {
    #[validate(custom(function = "not_blank"))]
    #[validate(length(max = 255, message = "Slug must be at most 255 characters"))]
    #[validate(regex(
        path = "*crate::utils::validation::SLUG_REGEX",
        message = "Slug must contain only lowercase letters, numbers, and hyphens"
    ))]
    #[schema(example = "medical-imaging")]
    pub slug: String,

    #[validate(nested)]
    pub title: LocalizedText,

    #[validate(nested)]
    pub short_description: LocalizedText,

    #[validate(nested)]
    pub full_description: LocalizedText,

    #[serde(default)]
    pub image: Option<String>,

    #[validate(length(min = 1, message = "At least one tag is required"))]
    #[validate(custom(function = "no_blank_items"))]
    pub tags: Vec<String>,

    #[validate(regex(
        path = "*crate::utils::validation::PROJECT_STATUS_REGEX",
        message = "Status must be 'active', 'completed', or 'upcoming'"
    ))]
    #[schema(example = "active")]
    pub status: String,

    #[schema(value_type = String, format = Date, example = "2024-09-01")]
    pub start_date: NaiveDate,

    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,

    /// Team member ids.
    #[validate(length(min = 1, message = "At least one team member is required"))]
    pub team: Vec<String>,

    #[validate(nested)]
    pub objectives: LocalizedList,

    #[serde(default)]
    #[validate(nested)]
    pub results: Option<OptionalLocalizedList>,
}

/// Project as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: i64,
    pub slug: String,
    pub title: LocalizedText,
    pub short_description: LocalizedText,
    pub full_description: LocalizedText,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub status: String,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub team: Vec<String>,
    pub objectives: LocalizedList,
    pub results: OptionalLocalizedList,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}
