use super::config::SessionConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token time-to-live: 30 days, matching the admin dashboard's
/// "stay signed in" expectation.
pub const SESSION_TOKEN_TTL: i64 = 2_592_000;

/// Admin role carried by a session.
///
/// `Admin` is enough for every read surface; `Superadmin` additionally
/// unlocks admin-list management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Superadmin,
}

/// Session claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,   // Subject (admin ID)
    pub email: String, // Admin email
    pub name: String,  // Admin display name
    pub role: Role,    // Admin role
    pub exp: i64,      // Expiration time
    pub iat: i64,      // Issued at
    pub jti: String,   // Token ID
}

impl SessionClaims {
    pub fn is_superadmin(&self) -> bool {
        self.role == Role::Superadmin
    }
}

/// Stateless JWT session authentication.
///
/// Signs and verifies self-contained session tokens; there is no
/// server-side session store, so a token remains valid until expiry.
#[derive(Clone)]
pub struct SessionAuth {
    secret: String,
}

impl SessionAuth {
    /// Create a new session auth instance.
    ///
    /// # Example
    /// ```ignore
    /// use axum_helpers::{SessionAuth, SessionConfig};
    /// use core_config::FromEnv;
    ///
    /// let config = SessionConfig::from_env()?;
    /// let auth = SessionAuth::new(&config);
    /// ```
    pub fn new(config: &SessionConfig) -> Self {
        tracing::info!("Stateless session auth initialized");
        Self {
            secret: config.secret.clone(),
        }
    }

    /// Create a session token with the default TTL (30 days)
    pub fn create_session_token(
        &self,
        admin_id: &str,
        email: &str,
        name: &str,
        role: Role,
    ) -> eyre::Result<String> {
        self.create_token(admin_id, email, name, role, SESSION_TOKEN_TTL)
    }

    /// Create a session token with a specific TTL
    pub fn create_token(
        &self,
        admin_id: &str,
        email: &str,
        name: &str,
        role: Role,
        ttl_seconds: i64,
    ) -> eyre::Result<String> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(ttl_seconds)).timestamp();
        let iat = now.timestamp();
        let jti = Uuid::new_v4().to_string();

        let claims = SessionClaims {
            sub: admin_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role,
            exp,
            iat,
            jti,
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify token signature and decode claims (rejects expired tokens)
    pub fn verify_token(&self, token: &str) -> eyre::Result<SessionClaims> {
        let token_data = decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
