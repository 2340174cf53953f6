//! Team member management with read-through caching.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use super::cached::{self, TEAM_MEMBER_BY_ID, TEAM_MEMBERS};
use crate::api::dto::{PageResponse, TeamMemberRequest, TeamMemberResponse};
use crate::domain::entities::EntityType;
use crate::domain::pagination::{PageRequest, TeamMemberSort};
use crate::domain::repositories::{TeamMemberRepository, TranslationRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::mapper::{group_by_entity, materialize, team_member_mapper};

pub struct TeamMemberService {
    members: Arc<dyn TeamMemberRepository>,
    translations: Arc<dyn TranslationRepository>,
    cache: Arc<dyn CacheService>,
}

impl TeamMemberService {
    pub fn new(
        members: Arc<dyn TeamMemberRepository>,
        translations: Arc<dyn TranslationRepository>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            members,
            translations,
            cache,
        }
    }

    pub async fn create_team_member(
        &self,
        request: TeamMemberRequest,
    ) -> Result<TeamMemberResponse, AppError> {
        let new_member = team_member_mapper::to_new_team_member(&request);
        let rows = team_member_mapper::to_translations(&request);

        let member = self.members.create(new_member, rows.clone()).await?;
        info!(team_member_id = member.id, "Team member created");

        cached::evict_all(self.cache.as_ref(), TEAM_MEMBERS).await;

        let translations = materialize(EntityType::TeamMember, member.id, rows);
        Ok(team_member_mapper::to_response(member, &translations))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no team member has this id.
    pub async fn get_team_member_by_id(&self, id: i64) -> Result<TeamMemberResponse, AppError> {
        let key = cached::key(TEAM_MEMBER_BY_ID, id);
        if let Some(hit) = cached::load(self.cache.as_ref(), &key).await {
            return Ok(hit);
        }

        let member = self
            .members
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        let rows = self
            .translations
            .find_by_entity(EntityType::TeamMember, member.id)
            .await?;

        let response = team_member_mapper::to_response(member, &rows);
        cached::store(self.cache.as_ref(), &key, &response).await;
        Ok(response)
    }

    pub async fn get_all_team_members(
        &self,
        request: PageRequest<TeamMemberSort>,
    ) -> Result<PageResponse<TeamMemberResponse>, AppError> {
        let key = cached::key(TEAM_MEMBERS, request.cache_key());
        if let Some(hit) = cached::load(self.cache.as_ref(), &key).await {
            return Ok(hit);
        }

        let page = self.members.list(request).await?;
        let ids: Vec<i64> = page.items.iter().map(|m| m.id).collect();
        let mut grouped = group_by_entity(
            self.translations
                .find_by_entities(EntityType::TeamMember, &ids)
                .await?,
        );

        let response: PageResponse<TeamMemberResponse> = page
            .map(|member| {
                let rows = grouped.remove(&member.id).unwrap_or_default();
                team_member_mapper::to_response(member, &rows)
            })
            .into();

        cached::store(self.cache.as_ref(), &key, &response).await;
        Ok(response)
    }

    /// Replaces a team member and its role/bio translations.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the team member does not exist.
    pub async fn update_team_member(
        &self,
        id: i64,
        request: TeamMemberRequest,
    ) -> Result<TeamMemberResponse, AppError> {
        let new_member = team_member_mapper::to_new_team_member(&request);
        let rows = team_member_mapper::to_translations(&request);

        let member = self
            .members
            .update(id, new_member, rows.clone())
            .await?
            .ok_or_else(|| not_found(id))?;
        info!(team_member_id = id, "Team member updated");

        self.evict(id).await;

        let translations = materialize(EntityType::TeamMember, member.id, rows);
        Ok(team_member_mapper::to_response(member, &translations))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the team member does not exist.
    pub async fn delete_team_member(&self, id: i64) -> Result<(), AppError> {
        if !self.members.delete(id).await? {
            return Err(not_found(id));
        }
        info!(team_member_id = id, "Team member deleted");

        self.evict(id).await;
        Ok(())
    }

    async fn evict(&self, id: i64) {
        cached::evict(self.cache.as_ref(), &[cached::key(TEAM_MEMBER_BY_ID, id)]).await;
        cached::evict_all(self.cache.as_ref(), TEAM_MEMBERS).await;
    }
}

fn not_found(id: i64) -> AppError {
    AppError::not_found("Team member not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::LocalizedText;
    use crate::domain::entities::{LanguageCode, TeamMember, TranslationField};
    use crate::domain::pagination::Page;
    use crate::domain::repositories::{MockTeamMemberRepository, MockTranslationRepository};
    use crate::infrastructure::cache::MockCacheService;
    use crate::mapper::test_support::row;
    use chrono::Utc;

    fn request() -> TeamMemberRequest {
        TeamMemberRequest {
            name: "  Aigerim Sadykova ".to_string(),
            role: LocalizedText {
                en: "Researcher".to_string(),
                ru: "Исследователь".to_string(),
                kz: "Зерттеуші".to_string(),
            },
            bio: LocalizedText {
                en: "Bio".to_string(),
                ru: "Био".to_string(),
                kz: "Өмірбаян".to_string(),
            },
            image: None,
            expertise: vec!["NLP".to_string()],
            email: Some("aigerim@example.com".to_string()),
            linkedin: Some(" ".to_string()),
            github: None,
            scholar: None,
        }
    }

    fn member(id: i64, name: &str) -> TeamMember {
        TeamMember {
            id,
            name: name.to_string(),
            image: None,
            expertise: vec!["NLP".to_string()],
            email: None,
            linkedin: None,
            github: None,
            scholar: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn permissive_cache() -> MockCacheService {
        let mut cache = MockCacheService::new();
        cache.expect_get().returning(|_| Ok(None));
        cache.expect_set().returning(|_, _, _| Ok(()));
        cache.expect_invalidate().returning(|_| Ok(()));
        cache.expect_invalidate_prefix().returning(|_| Ok(()));
        cache
    }

    #[tokio::test]
    async fn test_create_team_member_trims_and_translates() {
        let mut members = MockTeamMemberRepository::new();
        members
            .expect_create()
            .withf(|m, rows| {
                m.name == "Aigerim Sadykova" && m.linkedin.is_none() && rows.len() == 6
            })
            .times(1)
            .returning(|m, _| Ok(member(11, &m.name)));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate_prefix()
            .withf(|prefix| prefix == "teamMembers::")
            .times(1)
            .returning(|_| Ok(()));

        let service =
            TeamMemberService::new(Arc::new(members), Arc::new(MockTranslationRepository::new()), Arc::new(cache));

        let response = service.create_team_member(request()).await.unwrap();
        assert_eq!(response.id, 11);
        assert_eq!(response.role.kz, "Зерттеуші");
        assert_eq!(response.bio.ru, "Био");
    }

    #[tokio::test]
    async fn test_get_team_member_by_id_not_found() {
        let mut members = MockTeamMemberRepository::new();
        members.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = TeamMemberService::new(
            Arc::new(members),
            Arc::new(MockTranslationRepository::new()),
            Arc::new(permissive_cache()),
        );

        let err = service.get_team_member_by_id(5).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_all_team_members_uses_cached_page_key() {
        let mut members = MockTeamMemberRepository::new();
        members.expect_list().times(1).returning(|req| {
            Ok(Page {
                items: vec![member(1, "A"), member(2, "B")],
                page: req.page,
                size: req.size,
                total: 2,
            })
        });

        let mut translations = MockTranslationRepository::new();
        translations
            .expect_find_by_entities()
            .times(1)
            .returning(|_, _| {
                Ok(vec![row(
                    EntityType::TeamMember,
                    2,
                    TranslationField::Role,
                    LanguageCode::En,
                    "Engineer",
                )])
            });

        let mut cache = MockCacheService::new();
        cache
            .expect_get()
            .withf(|key| key == "teamMembers::0:10:name:DESC")
            .times(1)
            .returning(|_| Ok(None));
        cache
            .expect_set()
            .withf(|key, _, _| key == "teamMembers::0:10:name:DESC")
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = TeamMemberService::new(Arc::new(members), Arc::new(translations), Arc::new(cache));

        let page = service
            .get_all_team_members(PageRequest::new(
                0,
                10,
                TeamMemberSort::Name,
                crate::domain::pagination::Direction::Desc,
            ))
            .await
            .unwrap();

        assert_eq!(page.content.len(), 2);
        assert_eq!(page.content[0].role.en, "");
        assert_eq!(page.content[1].role.en, "Engineer");
        assert!(page.last);
    }

    #[tokio::test]
    async fn test_update_team_member_not_found() {
        let mut members = MockTeamMemberRepository::new();
        members.expect_update().times(1).returning(|_, _, _| Ok(None));

        let service = TeamMemberService::new(
            Arc::new(members),
            Arc::new(MockTranslationRepository::new()),
            Arc::new(MockCacheService::new()),
        );

        let err = service.update_team_member(8, request()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_team_member_evicts_entry_and_pages() {
        let mut members = MockTeamMemberRepository::new();
        members
            .expect_update()
            .times(1)
            .returning(|id, m, _| Ok(Some(member(id, &m.name))));

        let mut cache = MockCacheService::new();
        cache
            .expect_invalidate()
            .withf(|key| key == "teamMemberById::8")
            .times(1)
            .returning(|_| Ok(()));
        cache
            .expect_invalidate_prefix()
            .withf(|prefix| prefix == "teamMembers::")
            .times(1)
            .returning(|_| Ok(()));

        let service = TeamMemberService::new(
            Arc::new(members),
            Arc::new(MockTranslationRepository::new()),
            Arc::new(cache),
        );

        let response = service.update_team_member(8, request()).await.unwrap();
        assert_eq!(response.name, "Aigerim Sadykova");
    }

    #[tokio::test]
    async fn test_delete_team_member_not_found() {
        let mut members = MockTeamMemberRepository::new();
        members.expect_delete().times(1).returning(|_| Ok(false));

        let service = TeamMemberService::new(
            Arc::new(members),
            Arc::new(MockTranslationRepository::new()),
            Arc::new(MockCacheService::new()),
        );

        let err = service.delete_team_member(3).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
