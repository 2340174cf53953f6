//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`ProjectRepository`] - Projects with their translations
//! - [`TeamMemberRepository`] - Team members with their translations
//! - [`TranslationRepository`] - Translation lookups (single and batch)
//! - [`UserRepository`] - User accounts and roles
//! - [`HealthRepository`] - Database liveness
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod health_repository;
pub mod project_repository;
pub mod team_member_repository;
pub mod translation_repository;
pub mod user_repository;

pub use health_repository::HealthRepository;
pub use project_repository::ProjectRepository;
pub use team_member_repository::TeamMemberRepository;
pub use translation_repository::TranslationRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use health_repository::MockHealthRepository;
#[cfg(test)]
pub use project_repository::MockProjectRepository;
#[cfg(test)]
pub use team_member_repository::MockTeamMemberRepository;
#[cfg(test)]
pub use translation_repository::MockTranslationRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
