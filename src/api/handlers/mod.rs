//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod docs;
pub mod health;
pub mod projects;
pub mod team_members;

pub use auth::{login_handler, logout_handler, refresh_token_handler};
pub use docs::api_docs_handler;
pub use health::health_handler;
pub use projects::{
    create_project_handler, delete_project_handler, get_project_by_slug_handler,
    get_project_handler, list_projects_handler, update_project_handler,
};
pub use team_members::{
    create_team_member_handler, delete_team_member_handler, get_team_member_handler,
    list_team_members_handler, update_team_member_handler,
};
