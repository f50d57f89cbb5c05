//! Projects API routes
//!
//! Wires the projects domain to HTTP routes.

use axum::Router;
use axum_helpers::SessionAuth;
use domain_projects::{projects_router, MongoProjectRepository, ProjectService};

use crate::state::AppState;

/// Create the projects router
pub fn router(state: &AppState, auth: SessionAuth) -> Router {
    let repository = MongoProjectRepository::new(&state.db);
    let service = ProjectService::new(repository);

    projects_router(service, auth)
}
