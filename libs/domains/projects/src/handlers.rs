//! HTTP handlers for the projects API
//!
//! Listing and fetching are public (the shelf renders for every visitor);
//! create, update, and delete require an admin session.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{middleware, Json, Router};
use axum_helpers::errors::responses::{
    BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
    NotFoundResponse, UnauthorizedResponse,
};
use axum_helpers::{session_auth_middleware, SessionAuth, UuidPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProjectResult;
use crate::models::{CreateProject, Project, UpdateProject};
use crate::repository::ProjectRepository;
use crate::service::ProjectService;

/// OpenAPI documentation for the projects API
#[derive(OpenApi)]
#[openapi(
    paths(list_projects, create_project, get_project, update_project, delete_project),
    components(
        schemas(Project, CreateProject, UpdateProject),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            UnauthorizedResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "projects", description = "Video project registry (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Create the projects router.
///
/// Reads are public; mutations require a valid admin session.
pub fn projects_router<R: ProjectRepository + 'static>(
    service: ProjectService<R>,
    auth: SessionAuth,
) -> Router {
    let shared_service = Arc::new(service);
    let session_layer = middleware::from_fn_with_state(auth, session_auth_middleware);

    Router::new()
        .route(
            "/",
            get(list_projects::<R>)
                .merge(post(create_project::<R>).layer(session_layer.clone())),
        )
        .route(
            "/{id}",
            get(get_project::<R>).merge(
                put(update_project::<R>)
                    .delete(delete_project::<R>)
                    .layer(session_layer),
            ),
        )
        .with_state(shared_service)
}

/// List all projects in shelf order
#[utoipa::path(
    get,
    path = "",
    tag = "projects",
    responses(
        (status = 200, description = "List of projects", body = Vec<Project>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_projects<R: ProjectRepository>(
    State(service): State<Arc<ProjectService<R>>>,
) -> ProjectResult<Json<Vec<Project>>> {
    let projects = service.list_projects().await?;
    Ok(Json(projects))
}

/// Create a new project (admin only)
#[utoipa::path(
    post,
    path = "",
    tag = "projects",
    request_body = CreateProject,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_project<R: ProjectRepository>(
    State(service): State<Arc<ProjectService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateProject>,
) -> ProjectResult<impl IntoResponse> {
    let project = service.create_project(input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "projects",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project found", body = Project),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_project<R: ProjectRepository>(
    State(service): State<Arc<ProjectService<R>>>,
    UuidPath(id): UuidPath,
) -> ProjectResult<Json<Project>> {
    let project = service.get_project(id).await?;
    Ok(Json(project))
}

/// Update a project (admin only)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "projects",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    request_body = UpdateProject,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_project<R: ProjectRepository>(
    State(service): State<Arc<ProjectService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProject>,
) -> ProjectResult<Json<Project>> {
    let project = service.update_project(id, input).await?;
    Ok(Json(project))
}

/// Delete a project (admin only)
///
/// Interaction events referencing the project are not touched; analytics
/// render the dangling reference as "Unknown".
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "projects",
    params(
        ("id" = Uuid, Path, description = "Project ID")
    ),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_project<R: ProjectRepository>(
    State(service): State<Arc<ProjectService<R>>>,
    UuidPath(id): UuidPath,
) -> ProjectResult<impl IntoResponse> {
    service.delete_project(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
