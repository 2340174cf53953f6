//! Core domain entities.
//!
//! Entities are plain data structures. Creation inputs use separate `New*`
//! structs; projects and team members are replaced wholesale on update, so the
//! same `New*` struct doubles as the update payload.
//!
//! # Entity Types
//!
//! - [`Project`] - A research project
//! - [`TeamMember`] - A lab member
//! - [`Translation`] - One localized value of one field (EN/RU/KZ)
//! - [`User`] - An account with [`Role`]s

pub mod project;
pub mod team_member;
pub mod translation;
pub mod user;

pub use project::{NewProject, Project, ProjectStatus};
pub use team_member::{NewTeamMember, TeamMember};
pub use translation::{EntityType, LanguageCode, NewTranslation, Translation, TranslationField};
pub use user::{NewUser, Role, User};
