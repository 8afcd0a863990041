use crate::error::AppError;
use bcrypt::{hash, verify};

pub use bcrypt::DEFAULT_COST;

/// Cheapest cost bcrypt accepts. Only for tests.
pub const MIN_COST: u32 = 4;

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    hash(password, cost)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// A stored hash that bcrypt cannot parse is an internal error, not a wrong password.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    verify(password, password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
