//! Authentication and authorization module.
//!
//! This module provides:
//! - Stateless JWT session tokens (HS256) for the admin dashboard
//! - Authentication middleware for session-gated routes
//! - A superadmin gate for privileged management routes
//!
//! Session tokens are self-contained: there is no server-side session store,
//! so a token is valid until it expires. This mirrors the usual
//! cookie-session setup of a small CMS: the session carries the admin's
//! identity and role, and route gates only ask "is there a valid session"
//! or "is this session a superadmin".
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::auth::{SessionAuth, SessionConfig, session_auth_middleware};
//! use core_config::FromEnv;
//!
//! let config = SessionConfig::from_env()?;
//! let auth = SessionAuth::new(&config);
//!
//! let protected = Router::new()
//!     .route("/api/interactions", get(handler))
//!     .layer(axum::middleware::from_fn_with_state(auth, session_auth_middleware));
//! ```

pub mod config;
pub mod middleware;
pub mod session;

// Re-export commonly used types
pub use config::SessionConfig;
pub use middleware::{require_superadmin_middleware, session_auth_middleware};
pub use session::{Role, SessionAuth, SessionClaims, SESSION_TOKEN_TTL};
