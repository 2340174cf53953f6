//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, caching and token handling and
//! expose DTO-level operations to the HTTP handlers and the admin CLI.
//! Repositories and caches are injected as trait objects so the same
//! services run against PostgreSQL/Redis in production and in-memory fakes
//! in tests.
//!
//! # Available Services
//!
//! - [`services::project_service::ProjectService`] - Projects with localized content
//! - [`services::team_member_service::TeamMemberService`] - Lab team members
//! - [`services::auth_service::AuthService`] - Login, token rotation and bearer authentication
//! - [`services::user_service::UserService`] - Role bootstrap and account management

pub mod services;
