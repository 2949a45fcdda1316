// Credential hashing for seeded accounts

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

// Hash a password using bcrypt (fresh random salt per call)
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    verify(password, hash).context("Failed to verify password")
}
