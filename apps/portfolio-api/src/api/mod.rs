//! API routes module
//!
//! Defines all HTTP API routes for the portfolio API.

pub mod health;
pub mod interactions;
pub mod projects;

use axum::Router;
use axum_helpers::SessionAuth;

use crate::state::AppState;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    let auth = SessionAuth::new(&state.config.session);

    Router::new()
        .nest("/interactions", interactions::router(state, auth.clone()))
        .nest("/projects", projects::router(state, auth))
        .merge(health::router(state.clone()))
}
