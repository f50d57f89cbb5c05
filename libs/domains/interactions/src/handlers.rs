//! HTTP handlers for the interaction analytics API
//!
//! Ingestion is deliberately public: PAGE_VISIT events come from anonymous
//! visitors and the in-scene events must never block the 3D experience on
//! auth. The stats read is session-gated.

use crate::error::{InteractionError, ValidationErrorBody};
use crate::models::{
    ContactItemCount, DailyVisitCount, EventType, FieldError, InteractionFilter,
    InteractionSummary, InteractionView, ItemType, ProjectPopularity, RecordInteraction,
    StatsResponse, VisitorStats,
};
use crate::repository::{InteractionRepository, ProjectDirectory};
use crate::service::InteractionService;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use axum_helpers::errors::responses::{InternalServerErrorResponse, UnauthorizedResponse};
use axum_helpers::{session_auth_middleware, SessionAuth};
use std::sync::Arc;
use utoipa::OpenApi;

/// Interactions router state
pub type InteractionsState<R, P> = Arc<InteractionService<R, P>>;

/// OpenAPI documentation for the interactions API
#[derive(OpenApi)]
#[openapi(
    paths(record_interaction, get_interaction_stats),
    components(
        schemas(
            RecordInteraction,
            InteractionView,
            InteractionFilter,
            StatsResponse,
            InteractionSummary,
            ProjectPopularity,
            ContactItemCount,
            VisitorStats,
            DailyVisitCount,
            EventType,
            ItemType,
            FieldError,
            ValidationErrorBody,
        ),
        responses(UnauthorizedResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "interactions", description = "Interaction event ingestion and analytics (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Create the interactions router.
///
/// `POST /` stays public; `GET /` requires a valid admin session.
pub fn interactions_router<R, P>(auth: SessionAuth) -> Router<InteractionsState<R, P>>
where
    R: InteractionRepository + 'static,
    P: ProjectDirectory + 'static,
{
    Router::new().route(
        "/",
        post(record_interaction::<R, P>).merge(
            get(get_interaction_stats::<R, P>).layer(middleware::from_fn_with_state(
                auth,
                session_auth_middleware,
            )),
        ),
    )
}

/// Record one interaction event
#[utoipa::path(
    post,
    path = "",
    tag = "interactions",
    request_body = RecordInteraction,
    responses(
        (status = 201, description = "Event recorded", body = InteractionView),
        (status = 400, description = "Validation error", body = ValidationErrorBody),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn record_interaction<R: InteractionRepository, P: ProjectDirectory>(
    State(state): State<InteractionsState<R, P>>,
    Json(input): Json<RecordInteraction>,
) -> Result<impl IntoResponse, InteractionError> {
    let event = state.record(input).await?;
    // No name join on the write path; the listing resolves names at read time
    Ok((
        StatusCode::CREATED,
        Json(InteractionView::from_event(event, None)),
    ))
}

/// Retrieve raw events and the aggregated summary (admin only)
#[utoipa::path(
    get,
    path = "",
    tag = "interactions",
    params(InteractionFilter),
    responses(
        (status = 200, description = "Recent events plus summary statistics", body = StatsResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_interaction_stats<R: InteractionRepository, P: ProjectDirectory>(
    State(state): State<InteractionsState<R, P>>,
    Query(filter): Query<InteractionFilter>,
) -> Result<Json<StatsResponse>, InteractionError> {
    let response = state.stats(&filter).await?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VisitorTotals;
    use crate::repository::{MockInteractionRepository, MockProjectDirectory};
    use axum::body::Body;
    use axum::http::Request;
    use axum_helpers::{Role, SessionConfig};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::collections::{BTreeMap, HashMap};
    use tower::ServiceExt; // For oneshot()

    const TEST_SECRET: &str = "handler-test-session-secret-32-chars!";

    fn test_auth() -> SessionAuth {
        SessionAuth::new(&SessionConfig::new(TEST_SECRET))
    }

    fn app(repo: MockInteractionRepository, projects: MockProjectDirectory) -> Router {
        let service = InteractionService::new(repo, projects);
        interactions_router(test_auth()).with_state(Arc::new(service))
    }

    fn empty_stats_repo() -> MockInteractionRepository {
        let mut repo = MockInteractionRepository::new();
        repo.expect_list().returning(|_| Ok(vec![]));
        repo.expect_event_type_counts()
            .returning(|| Ok(BTreeMap::new()));
        repo.expect_project_popularity().returning(|_| Ok(vec![]));
        repo.expect_contact_item_stats().returning(|| Ok(vec![]));
        repo.expect_visitor_totals()
            .returning(|| Ok(VisitorTotals::default()));
        repo.expect_daily_visits().returning(|_| Ok(vec![]));
        repo
    }

    async fn json_body(body: Body) -> Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(value: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_record_page_visit_returns_201() {
        let mut repo = MockInteractionRepository::new();
        repo.expect_insert().returning(|event| Ok(event));
        let app = app(repo, MockProjectDirectory::new());

        let response = app
            .oneshot(post_json(json!({
                "eventType": "PAGE_VISIT",
                "metadata": { "visitorId": "visitor_123" }
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response.into_body()).await;
        assert_eq!(body["eventType"], "PAGE_VISIT");
        assert_eq!(body["metadata"]["visitorId"], "visitor_123");
        assert!(body.get("projectId").is_none());
    }

    #[tokio::test]
    async fn test_launch_clicked_without_project_id_returns_400() {
        // No insert expectation: nothing may reach the store
        let app = app(MockInteractionRepository::new(), MockProjectDirectory::new());

        let response = app
            .oneshot(post_json(json!({ "eventType": "LAUNCH_CLICKED" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response.into_body()).await;
        assert_eq!(body["message"], "Validation error");
        assert_eq!(
            body["errors"],
            json!([{
                "field": "projectId",
                "message": "Project ID is required for this event type"
            }])
        );
    }

    #[tokio::test]
    async fn test_unknown_event_type_returns_400() {
        let app = app(MockInteractionRepository::new(), MockProjectDirectory::new());

        let response = app
            .oneshot(post_json(json!({ "eventType": "REWOUND" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response.into_body()).await;
        assert_eq!(body["errors"][0]["field"], "eventType");
    }

    #[tokio::test]
    async fn test_stats_requires_session() {
        let app = app(empty_stats_repo(), MockProjectDirectory::new());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_stats_with_session_returns_summary() {
        let mut projects = MockProjectDirectory::new();
        projects
            .expect_project_names()
            .returning(|_| Ok(HashMap::new()));
        let app = app(empty_stats_repo(), projects);

        let token = test_auth()
            .create_session_token("admin-1", "admin@example.com", "Admin", Role::Admin)
            .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response.into_body()).await;
        assert!(body["stats"].as_array().unwrap().is_empty());
        assert_eq!(body["summary"]["visitorStats"]["totalVisits"], 0);
        assert_eq!(body["summary"]["visitorStats"]["uniqueVisitors"], 0);
    }

    #[tokio::test]
    async fn test_ingestion_needs_no_session() {
        // The write path is the one public surface: no auth header at all
        let mut repo = MockInteractionRepository::new();
        repo.expect_insert().returning(|event| Ok(event));
        let app = app(repo, MockProjectDirectory::new());

        let response = app
            .oneshot(post_json(json!({ "eventType": "PAGE_VISIT" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
