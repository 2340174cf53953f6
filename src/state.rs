//! Shared application state injected into every handler.

use std::sync::Arc;

use sqlx::PgPool;

use crate::application::services::{AuthService, ProjectService, TeamMemberService};
use crate::config::Config;
use crate::domain::repositories::{
    HealthRepository, ProjectRepository, TeamMemberRepository, TranslationRepository,
    UserRepository,
};
use crate::infrastructure::cache::{CacheService, TokenBlacklist};
use crate::infrastructure::persistence::{
    PgHealthRepository, PgProjectRepository, PgTeamMemberRepository, PgTranslationRepository,
    PgUserRepository,
};
use crate::infrastructure::security::JwtService;

/// Repository implementations the services are built from.
#[derive(Clone)]
pub struct Repositories {
    pub projects: Arc<dyn ProjectRepository>,
    pub team_members: Arc<dyn TeamMemberRepository>,
    pub translations: Arc<dyn TranslationRepository>,
    pub users: Arc<dyn UserRepository>,
    pub health: Arc<dyn HealthRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool.
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            projects: Arc::new(PgProjectRepository::new(pool.clone())),
            team_members: Arc::new(PgTeamMemberRepository::new(pool.clone())),
            translations: Arc::new(PgTranslationRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            health: Arc::new(PgHealthRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub project_service: Arc<ProjectService>,
    pub team_member_service: Arc<TeamMemberService>,
    pub auth_service: Arc<AuthService>,
    pub health: Arc<dyn HealthRepository>,
    pub cache: Arc<dyn CacheService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        repositories: Repositories,
        cache: Arc<dyn CacheService>,
        blacklist: Arc<dyn TokenBlacklist>,
        jwt: Arc<JwtService>,
        config: Arc<Config>,
    ) -> Self {
        let project_service = Arc::new(ProjectService::new(
            repositories.projects,
            repositories.translations.clone(),
            cache.clone(),
        ));
        let team_member_service = Arc::new(TeamMemberService::new(
            repositories.team_members,
            repositories.translations,
            cache.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(repositories.users, jwt, blacklist));

        Self {
            project_service,
            team_member_service,
            auth_service,
            health: repositories.health,
            cache,
            config,
        }
    }
}
