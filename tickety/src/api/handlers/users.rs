use axum::Json;

use crate::api::models::users::{CurrentUser, UserResponse};

/// Get the authenticated user
#[utoipa::path(
    get,
    path = "/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing, invalid or expired token"),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_current_user(current_user: CurrentUser) -> Json<UserResponse> {
    Json(current_user.into())
}
