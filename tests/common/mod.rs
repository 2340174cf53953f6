#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use cair_backend::application::services::UserService;
use cair_backend::config::{Config, JwtConfig, Profile};
use cair_backend::domain::entities::{
    EntityType, NewProject, NewTeamMember, NewTranslation, NewUser, Project, Role, TeamMember,
    Translation, User,
};
use cair_backend::domain::pagination::{
    Direction, Page, PageRequest, ProjectSort, SortKey, TeamMemberSort,
};
use cair_backend::domain::repositories::{
    HealthRepository, ProjectRepository, TeamMemberRepository, TranslationRepository,
    UserRepository,
};
use cair_backend::error::AppError;
use cair_backend::infrastructure::cache::{InMemoryTokenBlacklist, NullCache};
use cair_backend::infrastructure::security::{JwtService, RsaKeyPair};
use cair_backend::routes;
use cair_backend::state::{AppState, Repositories};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;

pub const ADMIN_USERNAME: &str = "admin@cair.kz";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const EDITOR_USERNAME: &str = "editor@cair.kz";
pub const EDITOR_PASSWORD: &str = "editor-password";

/// One key pair per test binary; generating RSA keys is slow.
static KEYS: LazyLock<RsaKeyPair> =
    LazyLock::new(|| RsaKeyPair::generate().expect("test key pair"));

pub fn test_jwt() -> JwtService {
    JwtService::new(&KEYS, Duration::from_secs(900), Duration::from_secs(3600)).unwrap()
}

pub fn test_config(profile: Profile) -> Config {
    Config {
        profile,
        database_url: "postgres://localhost/cair_test".to_string(),
        redis_url: None,
        listen_addr: "127.0.0.1:0".to_string(),
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        cache_ttl_seconds: 60,
        jwt: JwtConfig {
            access_token_ttl_seconds: 900,
            refresh_token_ttl_seconds: 3600,
            refresh_cookie_ttl_seconds: 3600,
            private_key_path: None,
            public_key_path: None,
        },
        admin_username: None,
        admin_password: None,
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        // The governor key extractor needs peer addresses the mock transport lacks.
        login_rate_limit: false,
        db_max_connections: 1,
        db_connect_timeout: 1,
        db_idle_timeout: 60,
        db_max_lifetime: 60,
    }
}

/// In-memory stand-in for every repository, sharing one translation table.
#[derive(Default)]
pub struct InMemoryStore {
    projects: Mutex<Vec<Project>>,
    team_members: Mutex<Vec<TeamMember>>,
    translations: Mutex<Vec<Translation>>,
    users: Mutex<Vec<User>>,
    next_id: Mutex<i64>,
    database_down: AtomicBool,
}

impl InMemoryStore {
    pub fn set_database_down(&self, down: bool) {
        self.database_down.store(down, Ordering::SeqCst);
    }

    pub fn project_count(&self) -> usize {
        self.projects.lock().unwrap().len()
    }

    pub fn translations_of(&self, entity_type: EntityType, entity_id: i64) -> Vec<Translation> {
        self.translations
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.entity_type == entity_type && t.entity_id == entity_id)
            .cloned()
            .collect()
    }

    fn next_id(&self) -> i64 {
        let mut id = self.next_id.lock().unwrap();
        *id += 1;
        *id
    }

    fn replace_translations(
        &self,
        entity_type: EntityType,
        entity_id: i64,
        rows: Vec<NewTranslation>,
    ) {
        let mut translations = self.translations.lock().unwrap();
        translations.retain(|t| !(t.entity_type == entity_type && t.entity_id == entity_id));
        for row in rows {
            translations.push(Translation {
                id: self.next_id(),
                entity_type,
                entity_id,
                field: row.field,
                language: row.language,
                value: row.value,
            });
        }
    }

    fn page<T: Clone, S: SortKey>(items: &[T], request: PageRequest<S>, id: impl Fn(&T) -> i64) -> Page<T> {
        let mut sorted = items.to_vec();
        sorted.sort_by_key(|item| id(item));
        if request.direction == Direction::Desc {
            sorted.reverse();
        }

        Page {
            items: sorted
                .into_iter()
                .skip(request.offset() as usize)
                .take(request.limit() as usize)
                .collect(),
            page: request.page,
            size: request.size,
            total: items.len() as i64,
        }
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn create(
        &self,
        project: NewProject,
        translations: Vec<NewTranslation>,
    ) -> Result<Project, AppError> {
        if self.exists_by_slug(&project.slug).await? {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "projects_slug_key" }),
            ));
        }

        let now = Utc::now();
        let created = Project {
            id: self.next_id(),
            slug: project.slug,
            image: project.image,
            tags: project.tags,
            status: project.status,
            start_date: project.start_date,
            end_date: project.end_date,
            team: project.team,
            created_at: now,
            updated_at: now,
        };
        self.projects.lock().unwrap().push(created.clone());
        self.replace_translations(EntityType::Project, created.id, translations);
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Project>, AppError> {
        Ok(self.projects.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Project>, AppError> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool, AppError> {
        Ok(self.projects.lock().unwrap().iter().any(|p| p.slug == slug))
    }

    async fn list(&self, request: PageRequest<ProjectSort>) -> Result<Page<Project>, AppError> {
        let projects = self.projects.lock().unwrap();
        Ok(Self::page(&projects, request, |p| p.id))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.projects.lock().unwrap().len() as i64)
    }

    async fn update(
        &self,
        id: i64,
        project: NewProject,
        translations: Vec<NewTranslation>,
    ) -> Result<Option<Project>, AppError> {
        let updated = {
            let mut projects = self.projects.lock().unwrap();
            let Some(existing) = projects.iter_mut().find(|p| p.id == id) else {
                return Ok(None);
            };
            existing.slug = project.slug;
            existing.image = project.image;
            existing.tags = project.tags;
            existing.status = project.status;
            existing.start_date = project.start_date;
            existing.end_date = project.end_date;
            existing.team = project.team;
            existing.updated_at = Utc::now();
            existing.clone()
        };
        self.replace_translations(EntityType::Project, id, translations);
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut projects = self.projects.lock().unwrap();
        let before = projects.len();
        projects.retain(|p| p.id != id);
        let deleted = projects.len() != before;
        drop(projects);

        if deleted {
            self.replace_translations(EntityType::Project, id, Vec::new());
        }
        Ok(deleted)
    }
}

#[async_trait]
impl TeamMemberRepository for InMemoryStore {
    async fn create(
        &self,
        member: NewTeamMember,
        translations: Vec<NewTranslation>,
    ) -> Result<TeamMember, AppError> {
        let now = Utc::now();
        let created = TeamMember {
            id: self.next_id(),
            name: member.name,
            image: member.image,
            expertise: member.expertise,
            email: member.email,
            linkedin: member.linkedin,
            github: member.github,
            scholar: member.scholar,
            created_at: now,
            updated_at: now,
        };
        self.team_members.lock().unwrap().push(created.clone());
        self.replace_translations(EntityType::TeamMember, created.id, translations);
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<TeamMember>, AppError> {
        Ok(self
            .team_members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn list(
        &self,
        request: PageRequest<TeamMemberSort>,
    ) -> Result<Page<TeamMember>, AppError> {
        let members = self.team_members.lock().unwrap();
        Ok(Self::page(&members, request, |m| m.id))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.team_members.lock().unwrap().len() as i64)
    }

    async fn update(
        &self,
        id: i64,
        member: NewTeamMember,
        translations: Vec<NewTranslation>,
    ) -> Result<Option<TeamMember>, AppError> {
        let updated = {
            let mut members = self.team_members.lock().unwrap();
            let Some(existing) = members.iter_mut().find(|m| m.id == id) else {
                return Ok(None);
            };
            existing.name = member.name;
            existing.image = member.image;
            existing.expertise = member.expertise;
            existing.email = member.email;
            existing.linkedin = member.linkedin;
            existing.github = member.github;
            existing.scholar = member.scholar;
            existing.updated_at = Utc::now();
            existing.clone()
        };
        self.replace_translations(EntityType::TeamMember, id, translations);
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut members = self.team_members.lock().unwrap();
        let before = members.len();
        members.retain(|m| m.id != id);
        let deleted = members.len() != before;
        drop(members);

        if deleted {
            self.replace_translations(EntityType::TeamMember, id, Vec::new());
        }
        Ok(deleted)
    }
}

#[async_trait]
impl TranslationRepository for InMemoryStore {
    async fn find_by_entity(
        &self,
        entity_type: EntityType,
        entity_id: i64,
    ) -> Result<Vec<Translation>, AppError> {
        Ok(self.translations_of(entity_type, entity_id))
    }

    async fn find_by_entities(
        &self,
        entity_type: EntityType,
        entity_ids: &[i64],
    ) -> Result<Vec<Translation>, AppError> {
        Ok(self
            .translations
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.entity_type == entity_type && entity_ids.contains(&t.entity_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        Ok(self.users.lock().unwrap().iter().any(|u| u.username == username))
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let created = User {
            id: self.next_id(),
            username: user.username,
            password_hash: user.password_hash,
            is_active: user.is_active,
            created_at: Utc::now(),
            roles: user.roles,
        };
        self.users.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn set_active(&self, username: &str, active: bool) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.username == username) {
            Some(user) => {
                user.is_active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ensure_role(&self, _role: Role) -> Result<(), AppError> {
        Ok(())
    }

    async fn grant_role(&self, username: &str, role: Role) -> Result<bool, AppError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.username == username) {
            Some(user) => {
                if !user.roles.contains(&role) {
                    user.roles.push(role);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl HealthRepository for InMemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        if self.database_down.load(Ordering::SeqCst) {
            return Err(AppError::internal("Database error", json!({})));
        }
        Ok(())
    }
}

/// A running app over an [`InMemoryStore`] with an admin and an editor account.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(Profile::Dev).await
    }

    pub async fn spawn_with(profile: Profile) -> Self {
        let store = Arc::new(InMemoryStore::default());

        let users = UserService::new(store.clone());
        users
            .create_user(ADMIN_USERNAME, ADMIN_PASSWORD, vec![Role::Admin])
            .await
            .unwrap();
        users
            .create_user(EDITOR_USERNAME, EDITOR_PASSWORD, vec![Role::User])
            .await
            .unwrap();

        let repositories = Repositories {
            projects: store.clone(),
            team_members: store.clone(),
            translations: store.clone(),
            users: store.clone(),
            health: store.clone(),
        };

        let state = AppState::new(
            repositories,
            Arc::new(NullCache::new()),
            Arc::new(InMemoryTokenBlacklist::new()),
            Arc::new(test_jwt()),
            Arc::new(test_config(profile)),
        );

        let server = TestServer::new(routes::router(state)).unwrap();
        Self { server, store }
    }

    /// Logs in and returns the access token and the raw refresh token.
    pub async fn login(&self, username: &str, password: &str) -> (String, String) {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .await;
        response.assert_status_ok();

        let access = response.json::<Value>()["accessToken"]
            .as_str()
            .unwrap()
            .to_string();
        let refresh = response.cookie("REFRESH_TOKEN").value().to_string();
        (access, refresh)
    }

    pub async fn admin_token(&self) -> String {
        self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await.0
    }

    pub async fn editor_token(&self) -> String {
        self.login(EDITOR_USERNAME, EDITOR_PASSWORD).await.0
    }
}

pub fn project_body(slug: &str) -> Value {
    json!({
        "slug": slug,
        "title": { "en": "Medical Imaging", "ru": "Медицинская визуализация", "kz": "Медициналық бейнелеу" },
        "shortDescription": { "en": "Short", "ru": "Кратко", "kz": "Қысқа" },
        "fullDescription": { "en": "Full", "ru": "Полно", "kz": "Толық" },
        "image": "https://cdn.cair.kz/imaging.png",
        "tags": ["AI", "Healthcare"],
        "status": "active",
        "startDate": "2024-09-01",
        "endDate": null,
        "team": ["1", "2"],
        "objectives": { "en": ["Detect"], "ru": ["Обнаружить"], "kz": ["Анықтау"] },
        "results": { "en": ["Published"] }
    })
}

pub fn team_member_body(name: &str) -> Value {
    json!({
        "name": name,
        "role": { "en": "Researcher", "ru": "Исследователь", "kz": "Зерттеуші" },
        "bio": { "en": "Works on NLP", "ru": "Занимается NLP", "kz": "NLP саласында" },
        "image": null,
        "expertise": ["NLP", "Speech"],
        "email": "member@cair.kz",
        "linkedin": "https://linkedin.com/in/member",
        "github": null,
        "scholar": null
    })
}
