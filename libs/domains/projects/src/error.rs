use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Project not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProjectResult<T> = Result<T, ProjectError>;

/// Convert ProjectError to AppError for standardized error responses
impl From<ProjectError> for AppError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::NotFound(id) => AppError::NotFound(format!("Project {} not found", id)),
            ProjectError::Validation(msg) => AppError::BadRequest(msg),
            ProjectError::Database(msg) => AppError::InternalServerError(msg),
            ProjectError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProjectError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ProjectError {
    fn from(err: mongodb::error::Error) -> Self {
        ProjectError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for ProjectError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProjectError::Database(format!("BSON serialization error: {}", err))
    }
}
