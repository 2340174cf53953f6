//! Project management with read-through caching.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use super::cached::{self, PROJECT_BY_ID, PROJECT_BY_SLUG, PROJECTS};
use crate::api::dto::{PageResponse, ProjectRequest, ProjectResponse};
use crate::domain::entities::{EntityType, Project};
use crate::domain::pagination::{PageRequest, ProjectSort};
use crate::domain::repositories::{ProjectRepository, TranslationRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::mapper::{group_by_entity, materialize, project_mapper};

/// Service for creating, reading and replacing projects.
///
/// Single projects are cached by id and by slug, pages by their page key.
/// Every write evicts the affected single entries and all cached pages.
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    translations: Arc<dyn TranslationRepository>,
    cache: Arc<dyn CacheService>,
}

impl ProjectService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        translations: Arc<dyn TranslationRepository>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            projects,
            translations,
            cache,
        }
    }

    /// Creates a project together with its translations.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is taken.
    pub async fn create_project(&self, request: ProjectRequest) -> Result<ProjectResponse, AppError> {
        self.ensure_slug_free(&request.slug).await?;

        let new_project = project_mapper::to_new_project(&request)?;
        let rows = project_mapper::to_translations(&request)?;

        let project = self.projects.create(new_project, rows.clone()).await?;
        info!(project_id = project.id, slug = %project.slug, "Project created");

        cached::evict_all(self.cache.as_ref(), PROJECTS).await;

        let translations = materialize(EntityType::Project, project.id, rows);
        Ok(project_mapper::to_response(project, &translations))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no project has this id.
    pub async fn get_project_by_id(&self, id: i64) -> Result<ProjectResponse, AppError> {
        let key = cached::key(PROJECT_BY_ID, id);
        if let Some(hit) = cached::load(self.cache.as_ref(), &key).await {
            return Ok(hit);
        }

        let project = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_by_id(id))?;

        let response = self.assemble(project).await?;
        cached::store(self.cache.as_ref(), &key, &response).await;
        Ok(response)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no project has this slug.
    pub async fn get_project_by_slug(&self, slug: &str) -> Result<ProjectResponse, AppError> {
        let key = cached::key(PROJECT_BY_SLUG, slug);
        if let Some(hit) = cached::load(self.cache.as_ref(), &key).await {
            return Ok(hit);
        }

        let project = self
            .projects
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Project not found", json!({ "slug": slug }))
            })?;

        let response = self.assemble(project).await?;
        cached::store(self.cache.as_ref(), &key, &response).await;
        Ok(response)
    }

    /// Lists one page of projects. Translations for the whole page are
    /// loaded with a single query.
    pub async fn get_all_projects(
        &self,
        request: PageRequest<ProjectSort>,
    ) -> Result<PageResponse<ProjectResponse>, AppError> {
        let key = cached::key(PROJECTS, request.cache_key());
        if let Some(hit) = cached::load(self.cache.as_ref(), &key).await {
            return Ok(hit);
        }

        let page = self.projects.list(request).await?;
        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        let mut grouped = group_by_entity(
            self.translations
                .find_by_entities(EntityType::Project, &ids)
                .await?,
        );

        let response: PageResponse<ProjectResponse> = page
            .map(|project| {
                let rows = grouped.remove(&project.id).unwrap_or_default();
                project_mapper::to_response(project, &rows)
            })
            .into();

        cached::store(self.cache.as_ref(), &key, &response).await;
        Ok(response)
    }

    /// Replaces a project and all of its translations.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the project does not exist and
    /// [`AppError::Conflict`] if the slug changes to one already in use.
    pub async fn update_project(
        &self,
        id: i64,
        request: ProjectRequest,
    ) -> Result<ProjectResponse, AppError> {
        let existing = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_by_id(id))?;

        if existing.slug != request.slug {
            self.ensure_slug_free(&request.slug).await?;
        }

        let new_project = project_mapper::to_new_project(&request)?;
        let rows = project_mapper::to_translations(&request)?;

        let project = self
            .projects
            .update(id, new_project, rows.clone())
            .await?
            .ok_or_else(|| not_found_by_id(id))?;
        info!(project_id = id, slug = %project.slug, "Project updated");

        self.evict(id, &[existing.slug.as_str(), project.slug.as_str()])
            .await;

        let translations = materialize(EntityType::Project, project.id, rows);
        Ok(project_mapper::to_response(project, &translations))
    }

    /// Deletes a project and its translations.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the project does not exist.
    pub async fn delete_project(&self, id: i64) -> Result<(), AppError> {
        let existing = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_by_id(id))?;

        if !self.projects.delete(id).await? {
            return Err(not_found_by_id(id));
        }
        info!(project_id = id, slug = %existing.slug, "Project deleted");

        self.evict(id, &[existing.slug.as_str()]).await;
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str) -> Result<(), AppError> {
        if self.projects.exists_by_slug(slug).await? {
            return Err(AppError::conflict(
                format!("Project with slug '{slug}' already exists"),
                json!({ "slug": slug }),
            ));
        }
        Ok(())
    }

    async fn assemble(&self, project: Project) -> Result<ProjectResponse, AppError> {
        let rows = self
            .translations
            .find_by_entity(EntityType::Project, project.id)
            .await?;
        Ok(project_mapper::to_response(project, &rows))
    }

    async fn evict(&self, id: i64, slugs: &[&str]) {
        let mut keys = vec![cached::key(PROJECT_BY_ID, id)];
        for slug in slugs {
            let key = cached::key(PROJECT_BY_SLUG, slug);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        cached::evict(self.cache.as_ref(), &keys).await;
        cached::evict_all(self.cache.as_ref(), PROJECTS).await;
    }
}

fn not_found_by_id(id: i64) -> AppError {
    AppError::not_found("Project not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::{LocalizedList, LocalizedText};
    use crate::domain::entities::{LanguageCode, ProjectStatus, TranslationField};
    use crate::domain::pagination::Page;
    use crate::domain::repositories::{MockProjectRepository, MockTranslationRepository};
    use crate::infrastructure::cache::MockCacheService;
    use crate::mapper::test_support::row;
    use chrono::{NaiveDate, Utc};
    use std::sync::Mutex;

    fn text(value: &str) -> LocalizedText {
        LocalizedText {
            en: value.to_string(),
            ru: value.to_string(),
            kz: value.to_string(),
        }
    }

    fn request(slug: &str) -> ProjectRequest {
        ProjectRequest {
            slug: slug.to_string(),
            title: text("Title"),
            short_description: text("Short"),
            full_description: text("Full"),
            image: None,
            tags: vec!["AI".to_string()],
            status: "active".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: None,
            team: vec!["1".to_string()],
            objectives: LocalizedList {
                en: vec!["a".to_string()],
                ru: vec!["б".to_string()],
                kz: vec!["в".to_string()],
            },
            results: None,
        }
    }

    fn project(id: i64, slug: &str) -> Project {
        Project {
            id,
            slug: slug.to_string(),
            image: None,
            tags: vec!["AI".to_string()],
            status: ProjectStatus::Active,
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: None,
            team: vec!["1".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// Cache that always misses and records every eviction.
    fn recording_cache(evicted: Arc<Mutex<Vec<String>>>) -> MockCacheService {
        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Ok(None));
        cache.expect_set().returning(|_, _, _| Ok(()));
        let single = evicted.clone();
        cache.expect_invalidate().returning(move |key| {
            single.lock().unwrap().push(key.to_string());
            Ok(())
        });
        cache.expect_invalidate_prefix().returning(move |prefix| {
            evicted.lock().unwrap().push(format!("{prefix}*"));
            Ok(())
        });
        cache
    }

    fn service(
        projects: MockProjectRepository,
        translations: MockTranslationRepository,
        cache: MockCacheService,
    ) -> ProjectService {
        ProjectService::new(Arc::new(projects), Arc::new(translations), Arc::new(cache))
    }

    #[tokio::test]
    async fn test_create_project_success() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_exists_by_slug()
            .withf(|slug| slug == "new-project")
            .times(1)
            .returning(|_| Ok(false));
        projects
            .expect_create()
            .withf(|p, rows| p.slug == "new-project" && rows.len() == 12)
            .times(1)
            .returning(|p, _| Ok(project(5, &p.slug)));

        let evicted = Arc::new(Mutex::new(Vec::new()));
        let service = service(
            projects,
            MockTranslationRepository::new(),
            recording_cache(evicted.clone()),
        );

        let response = service.create_project(request("new-project")).await.unwrap();
        assert_eq!(response.id, 5);
        assert_eq!(response.title.ru, "Title");
        assert_eq!(response.objectives.kz, vec!["в"]);
        assert_eq!(*evicted.lock().unwrap(), vec!["projects::*"]);
    }

    #[tokio::test]
    async fn test_create_project_slug_conflict() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_exists_by_slug()
            .times(1)
            .returning(|_| Ok(true));
        projects.expect_create().times(0);

        let service = service(
            projects,
            MockTranslationRepository::new(),
            MockCacheService::new(),
        );

        let err = service.create_project(request("taken")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_get_project_by_id_not_found() {
        let mut projects = MockProjectRepository::new();
        projects.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = service(
            projects,
            MockTranslationRepository::new(),
            recording_cache(Arc::new(Mutex::new(Vec::new()))),
        );

        let err = service.get_project_by_id(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_project_by_id_populates_cache() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(project(id, "cached"))));

        let mut translations = MockTranslationRepository::new();
        translations
            .expect_find_by_entity()
            .times(1)
            .returning(|entity_type, id| {
                Ok(vec![row(
                    entity_type,
                    id,
                    TranslationField::Title,
                    LanguageCode::En,
                    "Cached title",
                )])
            });

        let mut cache = MockCacheService::new();
        cache.expect_get().times(1).returning(|_| Ok(None));
        cache
            .expect_set()
            .withf(|key, value, _| key == "projectById::3" && value.contains("Cached title"))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = service(projects, translations, cache);
        let response = service.get_project_by_id(3).await.unwrap();
        assert_eq!(response.title.en, "Cached title");
        assert_eq!(response.title.kz, "");
    }

    #[tokio::test]
    async fn test_get_project_by_slug_served_from_cache() {
        let cached = project_mapper::to_response(project(9, "from-cache"), &[]);
        let raw = serde_json::to_string(&cached).unwrap();

        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .withf(|key| key == "projectBySlug::from-cache")
            .times(1)
            .returning(move |_| Ok(Some(raw.clone())));

        let mut projects = MockProjectRepository::new();
        projects.expect_find_by_slug().times(0);

        let service = service(projects, MockTranslationRepository::new(), cache);
        let response = service.get_project_by_slug("from-cache").await.unwrap();
        assert_eq!(response, cached);
    }

    #[tokio::test]
    async fn test_get_all_projects_batches_translations() {
        let mut projects = MockProjectRepository::new();
        projects.expect_list().times(1).returning(|req| {
            Ok(Page {
                items: vec![project(1, "one"), project(2, "two")],
                page: req.page,
                size: req.size,
                total: 3,
            })
        });

        let mut translations = MockTranslationRepository::new();
        translations
            .expect_find_by_entities()
            .withf(|entity_type, ids| *entity_type == EntityType::Project && ids == [1, 2])
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    row(EntityType::Project, 2, TranslationField::Title, LanguageCode::En, "Two"),
                    row(EntityType::Project, 1, TranslationField::Title, LanguageCode::En, "One"),
                ])
            });

        let service = service(
            projects,
            translations,
            recording_cache(Arc::new(Mutex::new(Vec::new()))),
        );

        let page = service
            .get_all_projects(PageRequest::new(0, 2, ProjectSort::Id, Default::default()))
            .await
            .unwrap();

        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].title.en, "One");
        assert_eq!(page.content[1].title.en, "Two");
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert!(page.first);
        assert!(!page.last);
    }

    #[tokio::test]
    async fn test_update_project_slug_change_conflict() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_find_by_id()
            .returning(|id| Ok(Some(project(id, "old-slug"))));
        projects
            .expect_exists_by_slug()
            .withf(|slug| slug == "taken")
            .times(1)
            .returning(|_| Ok(true));
        projects.expect_update().times(0);

        let service = service(
            projects,
            MockTranslationRepository::new(),
            MockCacheService::new(),
        );

        let err = service.update_project(1, request("taken")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_project_evicts_old_and_new_slug() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_find_by_id()
            .returning(|id| Ok(Some(project(id, "old-slug"))));
        projects.expect_exists_by_slug().returning(|_| Ok(false));
        projects
            .expect_update()
            .times(1)
            .returning(|id, p, _| Ok(Some(project(id, &p.slug))));

        let evicted = Arc::new(Mutex::new(Vec::new()));
        let service = service(
            projects,
            MockTranslationRepository::new(),
            recording_cache(evicted.clone()),
        );

        let response = service.update_project(4, request("new-slug")).await.unwrap();
        assert_eq!(response.slug, "new-slug");

        let evicted = evicted.lock().unwrap();
        assert!(evicted.contains(&"projectById::4".to_string()));
        assert!(evicted.contains(&"projectBySlug::old-slug".to_string()));
        assert!(evicted.contains(&"projectBySlug::new-slug".to_string()));
        assert!(evicted.contains(&"projects::*".to_string()));
    }

    #[tokio::test]
    async fn test_update_project_same_slug_skips_conflict_check() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_find_by_id()
            .returning(|id| Ok(Some(project(id, "same"))));
        projects.expect_exists_by_slug().times(0);
        projects
            .expect_update()
            .times(1)
            .returning(|id, p, _| Ok(Some(project(id, &p.slug))));

        let service = service(
            projects,
            MockTranslationRepository::new(),
            recording_cache(Arc::new(Mutex::new(Vec::new()))),
        );

        assert!(service.update_project(2, request("same")).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_project_not_found() {
        let mut projects = MockProjectRepository::new();
        projects.expect_find_by_id().returning(|_| Ok(None));

        let service = service(
            projects,
            MockTranslationRepository::new(),
            MockCacheService::new(),
        );

        let err = service.update_project(99, request("x")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_project() {
        let mut projects = MockProjectRepository::new();
        projects
            .expect_find_by_id()
            .returning(|id| Ok(Some(project(id, "gone"))));
        projects.expect_delete().times(1).returning(|_| Ok(true));

        let evicted = Arc::new(Mutex::new(Vec::new()));
        let service = service(
            projects,
            MockTranslationRepository::new(),
            recording_cache(evicted.clone()),
        );

        service.delete_project(6).await.unwrap();
        let evicted = evicted.lock().unwrap();
        assert!(evicted.contains(&"projectBySlug::gone".to_string()));
        assert!(evicted.contains(&"projectById::6".to_string()));
    }

    #[tokio::test]
    async fn test_delete_project_not_found() {
        let mut projects = MockProjectRepository::new();
        projects.expect_find_by_id().returning(|_| Ok(None));
        projects.expect_delete().times(0);

        let service = service(
            projects,
            MockTranslationRepository::new(),
            MockCacheService::new(),
        );

        let err = service.delete_project(6).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
