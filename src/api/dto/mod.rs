//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization (camelCase field
//! names), validator for input validation and utoipa for the OpenAPI schema.

pub mod auth;
pub mod health;
pub mod localized;
pub mod pagination;
pub mod project;
pub mod team_member;

pub use auth::{AuthResponse, LoginRequest};
pub use localized::{LocalizedList, LocalizedText, OptionalLocalizedList};
pub use pagination::{PageResponse, PaginationParams};
pub use project::{ProjectRequest, ProjectResponse};
pub use team_member::{TeamMemberRequest, TeamMemberResponse};
