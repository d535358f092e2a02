//! The authentication gate: turns an `Authorization` header into a [`CurrentUser`].

use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    errors::{AuthFailure, Error, Result},
    types::abbrev_uuid,
};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, instrument, trace};

/// Extract the token from a `Bearer <token>` header value.
///
/// The scheme is matched case-insensitively and the value must have exactly two
/// whitespace-separated parts.
pub fn bearer_token(header: &str) -> Option<&str> {
    let mut parts = header.split_whitespace();
    let (scheme, token) = (parts.next()?, parts.next()?);
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}

/// Resolve the caller from the raw `Authorization` header value.
///
/// The user is always re-read from the credential store, so deleted users are rejected and role
/// changes take effect immediately, even for tokens issued earlier.
#[instrument(skip_all)]
pub async fn authenticate(state: &AppState, authorization: Option<&str>) -> Result<CurrentUser> {
    let token = authorization
        .and_then(bearer_token)
        .ok_or(Error::unauthenticated(AuthFailure::MissingToken))?;

    let claims = session::verify_session_token(token, &state.config)?;

    let user = state
        .users
        .get_by_username(&claims.sub)
        .await?
        .ok_or(Error::unauthenticated(AuthFailure::SubjectNotFound))?;

    debug!("Authenticated user {} ({})", user.username, abbrev_uuid(&user.id));
    Ok(CurrentUser::from(user))
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        // A header that is not valid UTF-8 cannot be a bearer token
        let header = parts.headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok());
        if header.is_none() {
            trace!("No usable Authorization header");
        }
        authenticate(state, header).await
    }
}
