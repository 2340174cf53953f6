//! Repository trait for project data access.

use crate::domain::entities::{NewProject, NewTranslation, Project};
use crate::domain::pagination::{Page, PageRequest, ProjectSort};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for projects and their translations.
///
/// A project and its translations are always written together in one
/// transaction. Translations are read through
/// [`crate::domain::repositories::TranslationRepository`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgProjectRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_project.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Inserts a project and its translations.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(
        &self,
        project: NewProject,
        translations: Vec<NewTranslation>,
    ) -> Result<Project, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Project>, AppError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError>;

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError>;

    /// Returns one sorted page of projects with the total count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, request: PageRequest<ProjectSort>) -> Result<Page<Project>, AppError>;

    async fn count(&self) -> Result<i64, AppError>;

    /// Replaces all columns and all translations of a project.
    ///
    /// Returns `Ok(None)` when no project has the given id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new slug belongs to another project.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(
        &self,
        id: i64,
        project: NewProject,
        translations: Vec<NewTranslation>,
    ) -> Result<Option<Project>, AppError>;

    /// Deletes a project and its translations.
    ///
    /// Returns `Ok(true)` if a row was deleted, `Ok(false)` if not found.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
