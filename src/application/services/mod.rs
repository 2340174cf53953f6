//! Business logic services for the application layer.

pub mod auth_service;
pub(crate) mod cached;
pub mod project_service;
pub mod team_member_service;
pub mod user_service;

pub use auth_service::{AuthService, AuthUser, IssuedSession};
pub use project_service::ProjectService;
pub use team_member_service::TeamMemberService;
pub use user_service::UserService;
