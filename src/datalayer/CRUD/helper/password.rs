use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::RngCore;
use tracing::warn;

use crate::errors::{ServiceError, ServiceResult};

/// Hash a plain-text password with Argon2id and a fresh 16-byte salt.
///
/// The result is a PHC string (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`)
/// carrying its own parameters, so stored hashes keep verifying if the
/// defaults change.
///
/// # Example
/// ```
/// use todo_views_backend::datalayer::CRUD::helper::password::{check_password, make_password};
///
/// let encoded = make_password("correct horse").unwrap();
/// assert!(check_password("correct horse", &encoded));
/// assert!(!check_password("battery staple", &encoded));
/// ```
pub fn make_password(raw: &str) -> ServiceResult<String> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| ServiceError::InternalServerError(format!("password salt: {}", e)))?;

    Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::InternalServerError(format!("password hashing: {}", e)))
}

/// Verify a plain-text password against a stored PHC string.
/// Malformed or unsupported hashes never match.
pub fn check_password(raw: &str, encoded: &str) -> bool {
    let parsed = match PasswordHash::new(encoded) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Stored password hash is not a valid PHC string");
            return false;
        }
    };

    Argon2::default()
        .verify_password(raw.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_password_produces_argon2id_phc_string() {
        let encoded = make_password("hunter2").unwrap();
        assert!(encoded.starts_with("$argon2id$"));
        assert!(!encoded.contains("hunter2"));
        assert!(encoded.len() <= 128, "must fit the users.password column");
    }

    #[test]
    fn test_salts_differ_between_calls() {
        assert_ne!(make_password("same").unwrap(), make_password("same").unwrap());
    }

    #[test]
    fn test_check_password_round_trip() {
        let encoded = make_password("right").unwrap();
        assert!(check_password("right", &encoded));
        assert!(!check_password("wrong", &encoded));
    }

    #[test]
    fn test_check_password_rejects_malformed_hash() {
        assert!(!check_password("pw", ""));
        assert!(!check_password("pw", "plaintext"));
        assert!(!check_password("pw", "sha256$salt$digest"));
    }
}
