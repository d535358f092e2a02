//! JWT session token creation and verification.

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    errors::{AuthFailure, Error},
};

/// JWT session claims
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // Subject (username)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

impl SessionClaims {
    /// Create new session claims for a user
    pub fn new(username: &str, config: &Config) -> Self {
        let now = Utc::now();
        let exp = now + config.auth.jwt_expiry;

        Self {
            sub: username.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }
}

fn secret_key(config: &Config) -> Result<&str, Error> {
    config.secret_key.as_deref().ok_or_else(|| Error::Internal {
        operation: "JWT sessions: secret_key is required".to_string(),
    })
}

/// Create a signed token whose subject is `username`
pub fn create_session_token(username: &str, config: &Config) -> Result<String, Error> {
    let claims = SessionClaims::new(username, config);
    let key = EncodingKey::from_secret(secret_key(config)?.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| Error::Internal {
        operation: format!("create JWT: {e}"),
    })
}

/// Verify and decode a session token.
///
/// Only checks the signature and expiry: whether the subject still exists is up to the caller.
pub fn verify_session_token(token: &str, config: &Config) -> Result<SessionClaims, Error> {
    let key = DecodingKey::from_secret(secret_key(config)?.as_bytes());
    let mut validation = Validation::default();
    // Tokens expire exactly at `exp`
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => Error::unauthenticated(AuthFailure::ExpiredToken),

        // Client errors (401) - malformed tokens, bad signatures, invalid claims
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::ImmatureSignature
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_)
        | ErrorKind::InvalidAlgorithm => Error::unauthenticated(AuthFailure::InvalidToken),

        // Server errors (500) - key issues, internal failures
        ErrorKind::InvalidEcdsaKey
        | ErrorKind::InvalidRsaKey(_)
        | ErrorKind::RsaFailedSigning
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidKeyFormat
        | ErrorKind::MissingAlgorithm
        | ErrorKind::Crypto(_) => Error::Internal {
            operation: format!("JWT verification: {e}"),
        },

        // Catch-all for any future error variants (default to server error for safety)
        _ => Error::Internal {
            operation: format!("JWT verification (unknown error): {e}"),
        },
    })?;

    Ok(token_data.claims)
}
