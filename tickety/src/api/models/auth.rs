//! API request/response models for registration and login.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Registration payload.
///
/// Missing fields deserialize to empty strings so that they are reported by the same
/// validation message as empty ones. There is no `role` field; any role the client sends is
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[schema(example = "alice")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "alice")]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
