//! API request/response models for users.

use crate::db::models::users::UserDBResponse;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coarse permission class of a user.
///
/// Every self-registered user is a `client`. Admins are only created by the startup seeding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Admin,
}

/// The authenticated caller, as resolved by the authentication gate.
///
/// Always built from a fresh credential store lookup, never from token contents, so a role
/// change applies from the next request on.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<UserDBResponse> for CurrentUser {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            username: db.username,
            role: db.role,
        }
    }
}

/// Response body for `GET /me`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "alice")]
    pub username: String,
    pub role: Role,
}

impl From<CurrentUser> for UserResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            username: user.username,
            role: user.role,
        }
    }
}
