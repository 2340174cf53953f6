//! OpenAPI description of the REST API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth, health, projects, team_members};

/// Name of the bearer security scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "Bearer Authentication";

/// Public OpenAPI surface served at `/api/v3/api-docs`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CAIR Lab API",
        description = "Projects and team members of the lab, localized in English, Russian and Kazakh."
    ),
    paths(
        auth::login_handler,
        auth::refresh_token_handler,
        auth::logout_handler,
        projects::list_projects_handler,
        projects::get_project_handler,
        projects::get_project_by_slug_handler,
        projects::create_project_handler,
        projects::update_project_handler,
        projects::delete_project_handler,
        team_members::list_team_members_handler,
        team_members::get_team_member_handler,
        team_members::create_team_member_handler,
        team_members::update_team_member_handler,
        team_members::delete_team_member_handler,
        health::health_handler,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, token refresh and logout"),
        (name = "Projects", description = "Research projects"),
        (name = "Team members", description = "Lab members"),
        (name = "Health", description = "Liveness and dependency status"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
