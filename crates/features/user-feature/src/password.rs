use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

use crate::error::UserFeatureError;

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum-strength policy for new passwords
pub fn meets_policy(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Hash a password with Argon2id and a fresh random salt
pub fn hash_password(password: &str) -> Result<String, UserFeatureError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| UserFeatureError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash
///
/// An unparseable stored hash verifies as false rather than erroring, so a
/// corrupt row behaves like a wrong password.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
