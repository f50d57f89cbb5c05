//! Configuration types for axum-helpers.
//!
//! Provides configuration structs that implement the `FromEnv` trait from
//! `core_config`, following the same pattern as `MongoConfig`.

use core_config::{env_required, ConfigError, FromEnv};

/// Session authentication configuration.
///
/// Loaded from environment variables:
/// - `SESSION_SECRET` (required) - Must be at least 32 characters
///
/// # Example
///
/// ```ignore
/// use axum_helpers::SessionConfig;
/// use core_config::FromEnv;
///
/// // From environment variables
/// let config = SessionConfig::from_env()?;
///
/// // Manual construction (for testing)
/// let config = SessionConfig::new("my-super-secret-key-that-is-at-least-32-chars");
/// ```
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Token signing secret (minimum 32 characters)
    pub secret: String,
}

impl SessionConfig {
    /// Create a new SessionConfig with the given secret.
    ///
    /// # Panics
    /// Panics if the secret is less than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= 32,
            "Session secret must be at least 32 characters"
        );
        Self { secret }
    }
}

impl FromEnv for SessionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("SESSION_SECRET")?;

        if secret.len() < 32 {
            return Err(ConfigError::ParseError {
                key: "SESSION_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters for security (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        Ok(Self { secret })
    }
}
