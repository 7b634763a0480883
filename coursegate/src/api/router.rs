use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use coursegate_core::authorization::{AccessDecision, Action, Course, DecisionReason};
use utoipa::OpenApi;

use crate::app_state::SharedAppState;

use super::middleware::authorization::require_course_action;

use super::handlers::authorize::{__path_authorize_handler, authorize_handler, AuthorizeRequest};
use super::handlers::capabilities::{
    __path_user_capabilities_handler, user_capabilities_handler, UserCapabilitiesResponse,
};
use super::handlers::courses::{__path_course_handler, course_handler};
use super::handlers::health::{__path_health_checker_handler, health_checker_handler};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_checker_handler,
        authorize_handler,
        user_capabilities_handler,
        course_handler,
    ),
    components(
        schemas(AuthorizeRequest, UserCapabilitiesResponse, AccessDecision, DecisionReason, Course)
    ),
    tags(
        (name = "coursegate", description = "course authorization api")
    )
)]
pub struct ApiDoc;

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub struct ApiRoutes;

impl ApiRoutes {
    pub fn create(state: SharedAppState) -> Router {
        Router::new()
            .route("/api/v1/health", get(health_checker_handler))
            .route("/api/v1/authorize", post(authorize_handler))
            .route(
                "/api/v1/users/{user_id}/capabilities",
                get(user_capabilities_handler),
            )
            .route(
                "/api/v1/courses/{course_id}",
                get(course_handler).route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_course_action(Action::View),
                )),
            )
            .route("/api-docs/openapi.json", get(openapi_handler))
            .with_state(state)
    }
}
