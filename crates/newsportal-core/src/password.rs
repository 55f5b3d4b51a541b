//! Password hashing backed by bcrypt.
//!
//! Hashes are salted and carry their cost factor, so [`verify_password`]
//! works for any hash regardless of the cost it was made with.

use bcrypt::{hash, verify};

use crate::errors::AppError;

/// Hashes with an explicit bcrypt cost. Valid costs are 4 through 31.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    const MIN_COST: u32 = 4; // bcrypt::MIN_COST is private in bcrypt 0.17

    #[test]
    fn test_hash_with_cost_round_trip() {
        let hash = hash_password_with_cost("s3cret-pass", MIN_COST).unwrap();
        assert!(hash.starts_with("$2b$04$"));
        assert!(verify_password("s3cret-pass", &hash).unwrap());
        assert!(!verify_password("other-pass", &hash).unwrap());
    }

    #[test]
    fn test_invalid_cost_is_error() {
        assert!(hash_password_with_cost("password", 2).is_err());
    }
}
