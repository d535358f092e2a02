//! Password hashing and verification.
//!
//! Argon2 is CPU and memory bound, so the async wrappers run it on the blocking thread pool.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::PasswordConfig;
use crate::errors::Error;

/// Argon2 hashing parameters.
#[derive(Debug, Clone, Copy)]
pub struct Argon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    /// Create Argon2 instance with these parameters.
    fn to_argon2(self) -> Result<Argon2<'static>, Error> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None).map_err(|e| Error::Internal {
            operation: format!("create argon2 params: {e}"),
        })?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Check the parameters are accepted by argon2 without hashing anything
    pub fn validate(self) -> Result<(), Error> {
        self.to_argon2().map(|_| ())
    }
}

impl Default for Argon2Params {
    /// Secure defaults for production (Argon2id RFC recommendations)
    fn default() -> Self {
        Self {
            memory_kib: 19456, // 19 MB
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl From<&PasswordConfig> for Argon2Params {
    fn from(config: &PasswordConfig) -> Self {
        Self {
            memory_kib: config.argon2_memory_kib,
            iterations: config.argon2_iterations,
            parallelism: config.argon2_parallelism,
        }
    }
}

/// Hash a string using Argon2id with a fresh random salt.
///
/// Uses the provided parameters or secure defaults if None.
pub fn hash_string_with_params(input: &str, params: Option<Argon2Params>) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = params.unwrap_or_default().to_argon2()?;

    let hash = argon2.hash_password(input.as_bytes(), &salt).map_err(|e| Error::Internal {
        operation: format!("hash string: {e}"),
    })?;

    Ok(hash.to_string())
}

/// Verify a string against a hash.
///
/// Note: Verification uses the parameters embedded in the hash itself.
pub fn verify_string(input: &str, hash: &str) -> Result<bool, Error> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| Error::Internal {
        operation: format!("parse hash: {e}"),
    })?;

    // Verification always uses params from the hash
    let argon2 = Argon2::default();
    Ok(argon2.verify_password(input.as_bytes(), &parsed_hash).is_ok())
}

/// [`hash_string_with_params`] on the blocking thread pool
pub async fn hash_password(password: String, params: Argon2Params) -> Result<String, Error> {
    tokio::task::spawn_blocking(move || hash_string_with_params(&password, Some(params)))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("join password hashing task: {e}"),
        })?
}

/// [`verify_string`] on the blocking thread pool
pub async fn verify_password(password: String, hash: String) -> Result<bool, Error> {
    tokio::task::spawn_blocking(move || verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("join password verification task: {e}"),
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    // Keep tests fast
    const CHEAP: Argon2Params = Argon2Params {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn test_string_hashing() {
        let input = "test_password_123";
        let hash = hash_string_with_params(input, None).unwrap();

        // Hash should not be empty and must not contain the input
        assert!(!hash.is_empty());
        assert!(!hash.contains(input));
        assert!(hash.starts_with("$argon2id$"));

        // Should verify correctly
        assert!(verify_string(input, &hash).unwrap());

        // Should fail with wrong input
        assert!(!verify_string("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_same_input_different_hashes() {
        let input = "same_password";

        let hash1 = hash_string_with_params(input, Some(CHEAP)).unwrap();
        let hash2 = hash_string_with_params(input, Some(CHEAP)).unwrap();

        // Same input should produce different hashes due to salt
        assert_ne!(hash1, hash2);

        // But both should verify correctly
        assert!(verify_string(input, &hash1).unwrap());
        assert!(verify_string(input, &hash2).unwrap());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = Argon2Params {
            memory_kib: 8,
            iterations: 0,
            parallelism: 1,
        };
        assert!(params.validate().is_err());
        assert!(CHEAP.validate().is_ok());
    }

    #[test]
    fn test_verify_garbage_hash_is_internal_error() {
        assert!(matches!(verify_string("pw", "not-a-hash"), Err(Error::Internal { .. })));
    }

    #[tokio::test]
    async fn test_async_wrappers() {
        let hash = hash_password("hunter2".to_string(), CHEAP).await.unwrap();
        assert!(verify_password("hunter2".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("hunter3".to_string(), hash).await.unwrap());
    }
}
