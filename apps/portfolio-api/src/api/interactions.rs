//! Interactions API routes
//!
//! Wires the interactions domain to MongoDB and to the project registry
//! for display-name resolution.

use crate::state::AppState;
use async_trait::async_trait;
use axum::Router;
use axum_helpers::SessionAuth;
use domain_interactions::{
    interactions_router, InteractionError, InteractionService, MongoInteractionRepository,
    ProjectDirectory,
};
use domain_projects::{MongoProjectRepository, ProjectRepository};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Read-only adapter exposing the project registry to the interactions
/// domain as a name directory.
struct ProjectNameDirectory {
    repository: MongoProjectRepository,
}

#[async_trait]
impl ProjectDirectory for ProjectNameDirectory {
    async fn project_names(
        &self,
        ids: &[Uuid],
    ) -> domain_interactions::Result<HashMap<Uuid, String>> {
        self.repository
            .names_by_ids(ids)
            .await
            .map_err(|e| InteractionError::Database(e.to_string()))
    }
}

/// Create the interactions router with the registry join wired in
pub fn router(state: &AppState, auth: SessionAuth) -> Router {
    let repository = MongoInteractionRepository::new(&state.db);
    let directory = ProjectNameDirectory {
        repository: MongoProjectRepository::new(&state.db),
    };

    let service = InteractionService::new(repository, directory);

    interactions_router(auth).with_state(Arc::new(service))
}

/// Initialize interaction event indexes in MongoDB
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    let repository = MongoInteractionRepository::new(db);
    repository
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create interaction indexes: {}", e))?;
    info!("Interaction collection indexes created");
    Ok(())
}
