use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Accepts youtube.com and youtu.be links, with or without scheme/www.
static YOUTUBE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+")
        .expect("YouTube URL pattern is valid")
});

/// A video project shown on the cassette shelf.
///
/// `order` controls shelf position; lower comes first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Link to the project video
    pub youtube_url: String,
    /// Shelf position, ascending
    pub order: i64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new project
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(regex(path = *YOUTUBE_URL_RE, message = "Please provide a valid YouTube URL"))]
    pub youtube_url: String,

    /// Shelf position; defaults to one past the current maximum
    pub order: Option<i64>,
}

/// DTO for updating an existing project
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: Option<String>,

    #[validate(regex(path = *YOUTUBE_URL_RE, message = "Please provide a valid YouTube URL"))]
    pub youtube_url: Option<String>,

    pub order: Option<i64>,
}

impl Project {
    /// Create a new project from the DTO, with the shelf order resolved.
    pub fn new(input: CreateProject, order: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name.trim().to_string(),
            youtube_url: input.youtube_url.trim().to_string(),
            order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates from UpdateProject DTO
    pub fn apply_update(&mut self, update: UpdateProject) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(youtube_url) = update.youtube_url {
            self.youtube_url = youtube_url.trim().to_string();
        }
        if let Some(order) = update.order {
            self.order = order;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(name: &str, url: &str) -> CreateProject {
        CreateProject {
            name: name.to_string(),
            youtube_url: url.to_string(),
            order: None,
        }
    }

    #[test]
    fn test_valid_youtube_urls_accepted() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://youtube.com/watch?v=abc",
            "youtu.be/abc123",
            "www.youtube.com/embed/xyz",
        ] {
            assert!(create("VCR Demo", url).validate().is_ok(), "{url}");
        }
    }

    #[test]
    fn test_invalid_youtube_urls_rejected() {
        for url in ["https://vimeo.com/123", "not a url", ""] {
            assert!(create("VCR Demo", url).validate().is_err(), "{url}");
        }
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(create("", "https://youtu.be/abc").validate().is_err());
    }

    #[test]
    fn test_new_trims_fields() {
        let project = Project::new(create("  VCR Demo  ", " https://youtu.be/abc "), 3);
        assert_eq!(project.name, "VCR Demo");
        assert_eq!(project.youtube_url, "https://youtu.be/abc");
        assert_eq!(project.order, 3);
        assert!(!project.id.is_nil());
    }

    #[test]
    fn test_apply_update() {
        let mut project = Project::new(create("VCR Demo", "https://youtu.be/abc"), 0);
        let created_at = project.created_at;

        project.apply_update(UpdateProject {
            name: Some("Betamax Demo".to_string()),
            youtube_url: None,
            order: Some(7),
        });

        assert_eq!(project.name, "Betamax Demo");
        assert_eq!(project.youtube_url, "https://youtu.be/abc");
        assert_eq!(project.order, 7);
        assert_eq!(project.created_at, created_at);
        assert!(project.updated_at >= created_at);
    }
}
