//! Helpers shared across layers.
//!
//! - [`validation`] - Request validation rules (slug, status, non-blank text)

pub mod validation;
