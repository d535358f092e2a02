//! Credential store: users keyed by id and by unique username.

use crate::types::{abbrev_uuid, UserId};
use crate::{
    api::models::users::Role,
    db::{
        errors::Result,
        models::users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
    },
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

/// Access to stored users.
///
/// Username uniqueness is enforced by the store itself, so two racing registrations for the same
/// name yield exactly one success and one [`crate::db::errors::DbError::UniqueViolation`].
#[async_trait::async_trait]
pub trait Users: Send + Sync {
    /// Insert a new user with a freshly generated id
    async fn create(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse>;

    async fn get_by_id(&self, id: UserId) -> Result<Option<UserDBResponse>>;

    /// Exact, case-sensitive lookup
    async fn get_by_username(&self, username: &str) -> Result<Option<UserDBResponse>>;

    /// Apply the set fields of `request`, returning `None` if the user does not exist
    async fn update(&self, id: UserId, request: &UserUpdateDBRequest) -> Result<Option<UserDBResponse>>;
}

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDBResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            password_hash: user.password_hash,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Postgres-backed [`Users`]
#[derive(Debug, Clone)]
pub struct PgUsers {
    pool: PgPool,
}

impl PgUsers {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Users for PgUsers {
    #[instrument(skip(self, request), fields(username = %request.username), err)]
    async fn create(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        // Always generate a new ID for users
        let user_id = Uuid::new_v4();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, role, created_at
            "#,
        )
        .bind(user_id)
        .bind(&request.username)
        .bind(&request.password_hash)
        .bind(request.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(user.into())
    }

    #[instrument(skip(self), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, password_hash, role, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user.map(Into::into))
    }

    #[instrument(skip(self), err)]
    async fn get_by_username(&self, username: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, password_hash, role, created_at FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user.map(Into::into))
    }

    #[instrument(skip(self, request), fields(user_id = %abbrev_uuid(&id)), err)]
    async fn update(&self, id: UserId, request: &UserUpdateDBRequest) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                password_hash = COALESCE($2, password_hash),
                role = COALESCE($3, role)
            WHERE id = $1
            RETURNING id, username, password_hash, role, created_at
            "#,
        )
        .bind(id)
        .bind(request.password_hash.as_deref())
        .bind(request.role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(Into::into))
    }
}
