//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{FromRow, PgConnection, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewUser, Role, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

const SELECT_USER: &str = r#"
    SELECT u.id, u.username, u.password_hash, u.is_active, u.created_at,
           COALESCE(
               array_agg(r.name ORDER BY r.name) FILTER (WHERE r.name IS NOT NULL),
               '{}'
           )::text[] AS roles
    FROM users u
    LEFT JOIN user_roles ur ON ur.user_id = u.id
    LEFT JOIN roles r ON r.id = ur.role_id
"#;

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    roles: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        // Unknown role names grant nothing.
        let roles = row
            .roles
            .iter()
            .filter_map(|name| name.parse::<Role>().ok())
            .collect();

        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            is_active: row.is_active,
            created_at: row.created_at,
            roles,
        }
    }
}

pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

async fn assign_role(conn: &mut PgConnection, user_id: i64, role: Role) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO user_roles (user_id, role_id)
        SELECT $1, id FROM roles WHERE name = $2
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(role.as_str())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM roles WHERE name = $1)")
            .bind(role.as_str())
            .fetch_one(&mut *conn)
            .await?;
        if !exists {
            return Err(AppError::internal(
                "Role is not provisioned",
                json!({ "role": role.as_str() }),
            ));
        }
    }

    Ok(())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let sql = format!("{SELECT_USER} WHERE u.username = $1 GROUP BY u.id");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(exists)
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at) = sqlx::query_as::<_, (i64, DateTime<Utc>)>(
            r#"
            INSERT INTO users (username, password_hash, is_active)
            VALUES ($1, $2, $3)
            RETURNING id, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .fetch_one(&mut *tx)
        .await?;

        for role in &user.roles {
            assign_role(&mut tx, id, *role).await?;
        }

        tx.commit().await?;

        Ok(User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            is_active: user.is_active,
            created_at,
            roles: user.roles,
        })
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("{SELECT_USER} GROUP BY u.id ORDER BY u.id");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_active(&self, username: &str, active: bool) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET is_active = $2 WHERE username = $1")
            .bind(username)
            .bind(active)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ensure_role(&self, role: Role) -> Result<(), AppError> {
        sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(role.as_str())
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }

    async fn grant_role(&self, username: &str, role: Role) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;

        let user_id = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&mut *conn)
            .await?;

        match user_id {
            Some(id) => {
                assign_role(&mut conn, id, role).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
