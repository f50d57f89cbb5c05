//! Interaction domain error types

use crate::models::FieldError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_helpers::AppError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type for interaction operations
pub type Result<T> = std::result::Result<T, InteractionError>;

/// Interaction domain errors
#[derive(Debug, Error)]
pub enum InteractionError {
    /// Ingestion input failed validation; nothing was persisted
    #[error("Validation error")]
    Validation(Vec<FieldError>),

    /// MongoDB error
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl InteractionError {
    pub fn validation(error: FieldError) -> Self {
        Self::Validation(vec![error])
    }
}

/// Wire shape for ingestion validation failures:
/// `{ "message": "Validation error", "errors": [{ "field", "message" }] }`
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorBody {
    pub message: String,
    pub errors: Vec<FieldError>,
}

impl From<mongodb::error::Error> for InteractionError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for InteractionError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self::Database(format!("BSON serialization error: {}", err))
    }
}

impl From<mongodb::bson::de::Error> for InteractionError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        Self::Database(format!("BSON deserialization error: {}", err))
    }
}

impl IntoResponse for InteractionError {
    fn into_response(self) -> Response {
        match self {
            // Validation failures use the field-error body the tracking
            // clients expect, not the generic error envelope.
            Self::Validation(errors) => {
                tracing::info!(?errors, "Interaction rejected by validation");
                let body = ValidationErrorBody {
                    message: "Validation error".to_string(),
                    errors,
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            Self::Database(msg) => AppError::InternalServerError(msg).into_response(),
            Self::Internal(msg) => AppError::InternalServerError(msg).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_shape() {
        let body = ValidationErrorBody {
            message: "Validation error".to_string(),
            errors: vec![FieldError::new(
                "projectId",
                "Project ID is required for this event type",
            )],
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Validation error");
        assert_eq!(json["errors"][0]["field"], "projectId");
        assert_eq!(
            json["errors"][0]["message"],
            "Project ID is required for this event type"
        );
    }
}
