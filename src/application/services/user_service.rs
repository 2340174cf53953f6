//! Account provisioning used at startup and by the admin CLI.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::domain::entities::{NewUser, Role, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::security::hash_password;

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Makes sure every [`Role`] row exists. Safe to call repeatedly.
    pub async fn ensure_default_roles(&self) -> Result<(), AppError> {
        for role in Role::ALL {
            self.users.ensure_role(role).await?;
        }
        Ok(())
    }

    /// Creates the bootstrap admin unless an account with that name exists.
    ///
    /// Returns `true` when the account was created.
    pub async fn ensure_admin(&self, username: &str, password: &str) -> Result<bool, AppError> {
        if self.users.exists_by_username(username).await? {
            info!(username, "Admin user already exists");
            return Ok(false);
        }

        self.create_user(username, password, vec![Role::Admin]).await?;
        info!(username, "Admin user created");
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank username or a short
    /// password and [`AppError::Conflict`] if the username is taken.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        roles: Vec<Role>,
    ) -> Result<User, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::bad_request(
                "Username must not be blank",
                json!({ "field": "username" }),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::bad_request(
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
                json!({ "field": "password" }),
            ));
        }
        if self.users.exists_by_username(username).await? {
            return Err(AppError::conflict(
                format!("User '{username}' already exists"),
                json!({ "username": username }),
            ));
        }

        let password_hash = hash_password(password).map_err(|e| {
            AppError::internal("Failed to hash password", json!({ "reason": e.to_string() }))
        })?;

        self.users
            .create(NewUser {
                username: username.to_string(),
                password_hash,
                is_active: true,
                roles,
            })
            .await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.users.list().await
    }

    /// Activates or deactivates an account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn set_active(&self, username: &str, active: bool) -> Result<(), AppError> {
        if !self.users.set_active(username, active).await? {
            return Err(user_not_found(username));
        }
        info!(username, active, "User activation changed");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn grant_admin(&self, username: &str) -> Result<(), AppError> {
        if !self.users.grant_role(username, Role::Admin).await? {
            return Err(user_not_found(username));
        }
        info!(username, "Admin role granted");
        Ok(())
    }
}

fn user_not_found(username: &str) -> AppError {
    AppError::not_found("User not found", json!({ "username": username }))
}
