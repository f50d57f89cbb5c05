//! MongoDB implementation of ProjectRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, to_bson, Bson};
use mongodb::{Collection, Database};
use std::collections::HashMap;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProjectError, ProjectResult};
use crate::models::{Project, UpdateProject};
use crate::repository::ProjectRepository;

/// MongoDB implementation of the ProjectRepository
#[derive(Clone)]
pub struct MongoProjectRepository {
    collection: Collection<Project>,
}

impl MongoProjectRepository {
    /// Create a new MongoProjectRepository
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let db = client.database("portfolio");
    /// let repo = MongoProjectRepository::new(&db);
    /// ```
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("projects"),
        }
    }

    fn id_filter(id: Uuid) -> ProjectResult<mongodb::bson::Document> {
        Ok(doc! { "_id": to_bson(&id)? })
    }
}

#[async_trait]
impl ProjectRepository for MongoProjectRepository {
    #[instrument(skip(self, project), fields(project_name = %project.name))]
    async fn create(&self, project: Project) -> ProjectResult<Project> {
        self.collection.insert_one(&project).await?;

        tracing::info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProjectResult<Option<Project>> {
        let project = self.collection.find_one(Self::id_filter(id)?).await?;
        Ok(project)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ProjectResult<Vec<Project>> {
        use mongodb::options::FindOptions;

        let options = FindOptions::builder()
            .sort(doc! { "order": 1, "createdAt": -1 })
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let projects: Vec<Project> = cursor.try_collect().await?;
        Ok(projects)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: Uuid, input: UpdateProject) -> ProjectResult<Project> {
        let filter = Self::id_filter(id)?;
        let existing = self
            .collection
            .find_one(filter.clone())
            .await?
            .ok_or(ProjectError::NotFound(id))?;

        let mut updated = existing;
        updated.apply_update(input);

        self.collection.replace_one(filter, &updated).await?;

        tracing::info!(project_id = %id, "Project updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProjectResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)?).await?;

        if result.deleted_count == 0 {
            return Err(ProjectError::NotFound(id));
        }

        tracing::info!(project_id = %id, "Project deleted");
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn max_order(&self) -> ProjectResult<Option<i64>> {
        use mongodb::options::FindOneOptions;

        let options = FindOneOptions::builder()
            .sort(doc! { "order": -1 })
            .build();

        let highest = self
            .collection
            .find_one(doc! {})
            .with_options(options)
            .await?;
        Ok(highest.map(|project| project.order))
    }

    #[instrument(skip(self, ids), fields(id_count = ids.len()))]
    async fn names_by_ids(&self, ids: &[Uuid]) -> ProjectResult<HashMap<Uuid, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let id_values: Vec<Bson> = ids
            .iter()
            .map(to_bson)
            .collect::<Result<_, _>>()?;

        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": id_values } })
            .await?;
        let projects: Vec<Project> = cursor.try_collect().await?;

        Ok(projects
            .into_iter()
            .map(|project| (project.id, project.name))
            .collect())
    }
}
