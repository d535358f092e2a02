use axum::{Json, extract::State, http::StatusCode};
use tracing::info;

use crate::{
    AppState,
    api::{
        extractors::JsonBody,
        models::{
            auth::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest},
            users::Role,
        },
    },
    auth::{
        password::{self, Argon2Params},
        session,
    },
    db::{errors::DbError, models::users::UserCreateDBRequest},
    errors::{AuthFailure, Error},
};

fn require_credentials(username: &str, password: &str) -> Result<(), Error> {
    if username.is_empty() || password.is_empty() {
        return Err(Error::bad_request("Username and password are required"));
    }
    Ok(())
}

/// Register a new client account
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    tag = "authentication",
    responses(
        (status = 201, description = "User registered successfully", body = MessageResponse),
        (status = 400, description = "Missing username or password"),
        (status = 409, description = "Username already exists"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), Error> {
    require_credentials(&request.username, &request.password)?;

    // Hash the password on a blocking thread to avoid blocking async runtime
    let password_hash = password::hash_password(request.password, Argon2Params::from(&state.config.auth.password)).await?;

    let create_request = UserCreateDBRequest {
        username: request.username,
        password_hash,
        role: Role::Client,
    };

    match state.users.create(&create_request).await {
        Ok(user) => info!("Registered user {}", user.username),
        Err(DbError::UniqueViolation { .. }) => {
            return Err(Error::Conflict {
                message: "Username already exists".to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    }

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Exchange a username and password for a session token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid username or password"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, JsonBody(request): JsonBody<LoginRequest>) -> Result<Json<LoginResponse>, Error> {
    require_credentials(&request.username, &request.password)?;

    let user = state.users.get_by_username(&request.username).await?;

    // Unknown users are checked against a dummy hash so both failure paths cost the same
    let hash = match &user {
        Some(user) => user.password_hash.clone(),
        None => state.dummy_password_hash.clone(),
    };
    let verified = password::verify_password(request.password, hash).await?;

    let user = match user {
        Some(user) if verified => user,
        _ => return Err(Error::unauthenticated(AuthFailure::InvalidCredentials)),
    };

    let token = session::create_session_token(&user.username, &state.config)?;
    info!("User {} logged in", user.username);
    Ok(Json(LoginResponse { token }))
}
