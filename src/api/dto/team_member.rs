//! DTOs for team member endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::localized::LocalizedText;
use crate::utils::validation::{no_blank_items, not_blank};

/// Create or full-replace payload for a team member.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberRequest {
    #[validate(custom(function = "not_blank"))]
    #[validate(length(max = 255, message = "Name must be less than 255 characters"))]
    pub name: String,

    #[validate(nested)]
    pub role: LocalizedText,

    #[validate(nested)]
    pub bio: LocalizedText,

    #[serde(default)]
    pub image: Option<String>,

    #[validate(length(min = 1, message = "At least one expertise is required"))]
    #[validate(custom(function = "no_blank_items"))]
    pub expertise: Vec<String>,

    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[serde(default)]
    pub linkedin: Option<String>,

    #[serde(default)]
    pub github: Option<String>,

    #[serde(default)]
    pub scholar: Option<String>,
}

/// Team member as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberResponse {
    pub id: i64,
    pub name: String,
    pub role: LocalizedText,
    pub bio: LocalizedText,
    pub image: Option<String>,
    pub expertise: Vec<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub scholar: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}
