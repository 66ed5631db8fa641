use bcrypt::{DEFAULT_COST, hash, verify};

use crate::errors::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

/// Checks `password` against a stored bcrypt hash.
///
/// A malformed stored hash is an internal error, not a mismatch.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("student123").unwrap();
        assert_ne!(hashed, "student123");
        assert!(verify_password("student123", &hashed).unwrap());
        assert!(!verify_password("wrong-password", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("admin123").unwrap();
        let second = hash_password("admin123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_against_garbage_hash_is_error() {
        let result = verify_password("admin123", "not-a-bcrypt-hash");
        assert!(result.is_err());
    }
}
