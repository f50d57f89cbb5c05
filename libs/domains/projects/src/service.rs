//! Project Service - Business logic layer

use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProjectError, ProjectResult};
use crate::models::{CreateProject, Project, UpdateProject};
use crate::repository::ProjectRepository;

/// Project service providing business logic operations
pub struct ProjectService<R: ProjectRepository> {
    repository: Arc<R>,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new project.
    ///
    /// When no shelf order is supplied, the project lands one past the
    /// current maximum (or at 0 on an empty shelf).
    #[instrument(skip(self, input), fields(project_name = %input.name))]
    pub async fn create_project(&self, input: CreateProject) -> ProjectResult<Project> {
        input
            .validate()
            .map_err(|e| ProjectError::Validation(e.to_string()))?;

        let order = match input.order {
            Some(order) => order,
            None => self
                .repository
                .max_order()
                .await?
                .map(|highest| highest + 1)
                .unwrap_or(0),
        };

        self.repository.create(Project::new(input, order)).await
    }

    /// Get a project by ID
    #[instrument(skip(self))]
    pub async fn get_project(&self, id: Uuid) -> ProjectResult<Project> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProjectError::NotFound(id))
    }

    /// List all projects in shelf order
    #[instrument(skip(self))]
    pub async fn list_projects(&self) -> ProjectResult<Vec<Project>> {
        self.repository.list().await
    }

    /// Update an existing project
    #[instrument(skip(self, input))]
    pub async fn update_project(&self, id: Uuid, input: UpdateProject) -> ProjectResult<Project> {
        input
            .validate()
            .map_err(|e| ProjectError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete a project.
    ///
    /// Interaction events referencing this project are left untouched; the
    /// analytics aggregation degrades their reference to "Unknown".
    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: Uuid) -> ProjectResult<()> {
        self.repository.delete(id).await?;
        Ok(())
    }

    /// Resolve project IDs to display names
    #[instrument(skip(self, ids))]
    pub async fn names_by_ids(&self, ids: &[Uuid]) -> ProjectResult<HashMap<Uuid, String>> {
        self.repository.names_by_ids(ids).await
    }
}

impl<R: ProjectRepository> Clone for ProjectService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProjectRepository;

    fn create_input(order: Option<i64>) -> CreateProject {
        CreateProject {
            name: "VCR Demo".to_string(),
            youtube_url: "https://youtu.be/abc".to_string(),
            order,
        }
    }

    #[tokio::test]
    async fn test_create_project_defaults_order_past_max() {
        let mut repo = MockProjectRepository::new();
        repo.expect_max_order().returning(|| Ok(Some(4)));
        repo.expect_create().returning(|project| Ok(project));

        let service = ProjectService::new(repo);
        let project = service.create_project(create_input(None)).await.unwrap();

        assert_eq!(project.order, 5);
    }

    #[tokio::test]
    async fn test_create_first_project_starts_at_zero() {
        let mut repo = MockProjectRepository::new();
        repo.expect_max_order().returning(|| Ok(None));
        repo.expect_create().returning(|project| Ok(project));

        let service = ProjectService::new(repo);
        let project = service.create_project(create_input(None)).await.unwrap();

        assert_eq!(project.order, 0);
    }

    #[tokio::test]
    async fn test_create_respects_explicit_order() {
        let mut repo = MockProjectRepository::new();
        repo.expect_create().returning(|project| Ok(project));

        let service = ProjectService::new(repo);
        let project = service.create_project(create_input(Some(2))).await.unwrap();

        assert_eq!(project.order, 2);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_url_before_store() {
        // No create expectation: reaching the repository would panic
        let repo = MockProjectRepository::new();
        let service = ProjectService::new(repo);

        let result = service
            .create_project(CreateProject {
                name: "VCR Demo".to_string(),
                youtube_url: "https://vimeo.com/123".to_string(),
                order: None,
            })
            .await;

        assert!(matches!(result, Err(ProjectError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_project_not_found() {
        let mut repo = MockProjectRepository::new();
        repo.expect_get_by_id().returning(|_| Ok(None));

        let service = ProjectService::new(repo);
        let result = service.get_project(Uuid::now_v7()).await;

        assert!(matches!(result, Err(ProjectError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_names_by_ids_passthrough() {
        let id = Uuid::now_v7();
        let mut repo = MockProjectRepository::new();
        repo.expect_names_by_ids().returning(move |_| {
            Ok(HashMap::from([(id, "VCR Demo".to_string())]))
        });

        let service = ProjectService::new(repo);
        let names = service.names_by_ids(&[id]).await.unwrap();

        assert_eq!(names.get(&id).map(String::as_str), Some("VCR Demo"));
    }
}
