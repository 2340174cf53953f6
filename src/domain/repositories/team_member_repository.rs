//! Repository trait for team member data access.

use crate::domain::entities::{NewTeamMember, NewTranslation, TeamMember};
use crate::domain::pagination::{Page, PageRequest, TeamMemberSort};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for team members and their translations.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTeamMemberRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamMemberRepository: Send + Sync {
    /// Inserts a team member and its translations in one transaction.
    async fn create(
        &self,
        member: NewTeamMember,
        translations: Vec<NewTranslation>,
    ) -> Result<TeamMember, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<TeamMember>, AppError>;

    async fn list(
        &self,
        request: PageRequest<TeamMemberSort>,
    ) -> Result<Page<TeamMember>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Replaces all columns and all translations. `Ok(None)` when absent.
    async fn update(
        &self,
        id: i64,
        member: NewTeamMember,
        translations: Vec<NewTranslation>,
    ) -> Result<Option<TeamMember>, AppError>;

    /// Deletes a team member and its translations.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
