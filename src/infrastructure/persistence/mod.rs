//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` row structs.
//!
//! # Repositories
//!
//! - [`PgProjectRepository`] - Projects and their translations
//! - [`PgTeamMemberRepository`] - Team members and their translations
//! - [`PgTranslationRepository`] - Translation lookups
//! - [`PgUserRepository`] - Accounts and roles
//! - [`PgHealthRepository`] - Liveness probe

pub mod pg_health_repository;
pub mod pg_project_repository;
pub mod pg_team_member_repository;
pub mod pg_translation_repository;
pub mod pg_user_repository;

pub use pg_health_repository::PgHealthRepository;
pub use pg_project_repository::PgProjectRepository;
pub use pg_team_member_repository::PgTeamMemberRepository;
pub use pg_translation_repository::PgTranslationRepository;
pub use pg_user_repository::PgUserRepository;
