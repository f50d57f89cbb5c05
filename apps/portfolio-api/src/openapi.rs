//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portfolio API",
        version = "0.1.0",
        description = "Interaction analytics and project registry for the VCR portfolio site",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/interactions", api = domain_interactions::ApiDoc),
        (path = "/api/projects", api = domain_projects::ApiDoc)
    ),
    tags(
        (name = "interactions", description = "Interaction event ingestion and analytics (MongoDB)"),
        (name = "projects", description = "Video project registry (MongoDB)")
    )
)]
pub struct ApiDoc;
