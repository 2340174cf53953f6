//! Shared validation rules for request DTOs.

use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

/// Lowercase letters, digits and hyphens.
pub static SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

pub static PROJECT_STATUS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(active|completed|upcoming)$").unwrap());

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Rejects lists containing blank entries.
pub fn no_blank_items(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        let mut err = ValidationError::new("blank_item");
        err.message = Some("entries must not be blank".into());
        return Err(err);
    }
    Ok(())
}
