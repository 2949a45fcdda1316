// Error handling for storefront-seed

/// Reason a fixture load was aborted.
///
/// Every variant causes the loader's transaction to roll back, so the store
/// is left exactly as it was before the run.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Invalid fixture set: {0}")]
    InvalidFixture(String),

    #[error("Product '{product}' references unknown {kind} '{slug}'")]
    MissingReference {
        product: String,
        kind: &'static str,
        slug: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing failed: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Could not encode list column: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SeedError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        SeedError::InvalidFixture(msg.into())
    }
}
