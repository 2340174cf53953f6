//! Team member entity.

use chrono::{DateTime, Utc};

/// A lab member. Role and bio are localized and stored as translations.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub expertise: Vec<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub scholar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for inserting or fully replacing a team member.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTeamMember {
    pub name: String,
    pub image: Option<String>,
    pub expertise: Vec<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub scholar: Option<String>,
}
