//! Repository trait for user accounts and roles.

use crate::domain::entities::{NewUser, Role, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for users and role assignments.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_user.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds a user with their roles loaded.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError>;

    /// Creates a user and assigns the given roles.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the username is taken.
    /// Returns [`AppError::Internal`] if a role row is missing or on database errors.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Sets the `is_active` flag. Returns `Ok(false)` when the user does not exist.
    async fn set_active(&self, username: &str, active: bool) -> Result<bool, AppError>;

    /// Inserts the role row if it does not exist yet.
    async fn ensure_role(&self, role: Role) -> Result<(), AppError>;

    /// Assigns a role to an existing user. Idempotent.
    ///
    /// Returns `Ok(false)` when the user does not exist.
    async fn grant_role(&self, username: &str, role: Role) -> Result<bool, AppError>;
}
