use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ProjectResult;
use crate::models::{Project, UpdateProject};

/// Repository trait for Project persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Persist a new project
    async fn create(&self, project: Project) -> ProjectResult<Project>;

    /// Get a project by ID
    async fn get_by_id(&self, id: Uuid) -> ProjectResult<Option<Project>>;

    /// List all projects, sorted by shelf order ascending then creation
    /// time descending
    async fn list(&self) -> ProjectResult<Vec<Project>>;

    /// Update an existing project
    async fn update(&self, id: Uuid, input: UpdateProject) -> ProjectResult<Project>;

    /// Delete a project by ID
    async fn delete(&self, id: Uuid) -> ProjectResult<bool>;

    /// Highest shelf order currently in use, if any project exists
    async fn max_order(&self) -> ProjectResult<Option<i64>>;

    /// Map each existing ID to its display name; missing IDs are absent
    async fn names_by_ids(&self, ids: &[Uuid]) -> ProjectResult<HashMap<Uuid, String>>;
}
