//! Translation entity: one localized value of one field of one entity.

use std::fmt;
use std::str::FromStr;

/// Owner type of a translation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Project,
    TeamMember,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::TeamMember => "TeamMember",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Project" => Ok(Self::Project),
            "TeamMember" => Ok(Self::TeamMember),
            other => Err(format!("unknown entity type: {other}")),
        }
    }
}

/// Localized field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslationField {
    Title,
    ShortDescription,
    FullDescription,
    /// JSON array of strings.
    Objectives,
    /// JSON array of strings.
    Results,
    Role,
    Bio,
}

impl TranslationField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "TITLE",
            Self::ShortDescription => "SHORT_DESCRIPTION",
            Self::FullDescription => "FULL_DESCRIPTION",
            Self::Objectives => "OBJECTIVES",
            Self::Results => "RESULTS",
            Self::Role => "ROLE",
            Self::Bio => "BIO",
        }
    }
}

impl fmt::Display for TranslationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TITLE" => Ok(Self::Title),
            "SHORT_DESCRIPTION" => Ok(Self::ShortDescription),
            "FULL_DESCRIPTION" => Ok(Self::FullDescription),
            "OBJECTIVES" => Ok(Self::Objectives),
            "RESULTS" => Ok(Self::Results),
            "ROLE" => Ok(Self::Role),
            "BIO" => Ok(Self::Bio),
            other => Err(format!("unknown translation field: {other}")),
        }
    }
}

/// Supported content languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageCode {
    En,
    Ru,
    Kz,
}

impl LanguageCode {
    pub const ALL: [LanguageCode; 3] = [Self::En, Self::Ru, Self::Kz];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::Ru => "RU",
            Self::Kz => "KZ",
        }
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EN" => Ok(Self::En),
            "RU" => Ok(Self::Ru),
            "KZ" => Ok(Self::Kz),
            other => Err(format!("unknown language code: {other}")),
        }
    }
}

/// A persisted translation row.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub id: i64,
    pub entity_type: EntityType,
    pub entity_id: i64,
    pub field: TranslationField,
    pub language: LanguageCode,
    pub value: String,
}

/// A translation to be written for an entity whose id is assigned by the
/// repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTranslation {
    pub field: TranslationField,
    pub language: LanguageCode,
    pub value: String,
}

impl NewTranslation {
    pub fn new(field: TranslationField, language: LanguageCode, value: impl Into<String>) -> Self {
        Self {
            field,
            language,
            value: value.into(),
        }
    }
}
