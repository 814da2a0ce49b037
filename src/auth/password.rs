//! Password hashing using bcrypt
//!
//! Credential verification happens in the external identity service; the
//! backend only hashes the seeded bootstrap account.

use crate::core::error::{BoomError, Result};

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| BoomError::AuthenticationError(format!("Failed to hash password: {}", e)))
}
