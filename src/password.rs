use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
    password_hash::rand_core::OsRng,
};
use std::sync::Arc;

use crate::error::ApiError;

/// PasswordHasher Trait
///
/// Abstract contract for the one-way salted hash + verify collaborator.
/// Keeping this behind a trait lets tests substitute a cheap implementation
/// and keeps the Argon2 details out of the user service.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a clear-text password into an opaque PHC string.
    fn hash(&self, password: &str) -> Result<String, ApiError>;
    /// Verifies a clear-text password against a stored PHC string.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// The concrete type used to share the hasher across the application state.
pub type HasherState = Arc<dyn PasswordHasher>;

/// Argon2Hasher
///
/// Production implementation backed by Argon2id with the crate's default
/// parameters and a fresh random salt per hash.
#[derive(Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!("password hashing failed: {:?}", e);
                ApiError::Internal
            })
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            // A stored hash that does not parse is treated as a failed match,
            // never as an error surfaced to the user.
            tracing::error!("stored password hash is not a valid PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(hasher.verify("hunter2", &hash));
        assert!(!hasher.verify("hunter3", &hash));
    }

    #[test]
    fn garbage_stored_hash_fails_closed() {
        let hasher = Argon2Hasher;
        assert!(!hasher.verify("anything", "not-a-phc-string"));
    }
}
