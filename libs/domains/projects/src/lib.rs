//! Projects Domain
//!
//! The registry of video projects behind the cassette shelf, backed by
//! MongoDB:
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints (reads public, writes session-gated)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← validation, shelf-order defaulting
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + MongoDB implementation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Project entity, DTOs
//! └─────────────┘
//! ```
//!
//! The interactions domain consumes this registry only through name lookups
//! (`names_by_ids`), wired up by the application.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ProjectError, ProjectResult};
pub use handlers::{projects_router, ApiDoc};
pub use models::{CreateProject, Project, UpdateProject};
pub use mongodb::MongoProjectRepository;
pub use repository::ProjectRepository;
pub use service::ProjectService;
