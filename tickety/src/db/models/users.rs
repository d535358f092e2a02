//! Database models for users.

use crate::api::models::users::Role;
use crate::types::UserId;
use chrono::{DateTime, Utc};

/// Database request for creating a new user
#[derive(Debug, Clone)]
pub struct UserCreateDBRequest {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

/// Database request for updating a user. Username is immutable and not part of it.
#[derive(Debug, Clone, Default)]
pub struct UserUpdateDBRequest {
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

/// Database response for a user
#[derive(Debug, Clone, PartialEq)]
pub struct UserDBResponse {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
