use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use coursegate_core::authorization::{AccessDecision, Action, CourseId};
use std::{future::Future, pin::Pin};
use tracing::{info, warn};

use crate::{api::error::AppError, app_state::SharedAppState};

/// Header carrying the id of the acting user
pub const USER_HEADER: &str = "x-coursegate-user";

type GuardFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>;

/// Added to request extensions once the guarded action was permitted
#[derive(Clone, Debug)]
pub struct CourseAccess {
    pub user: String,
    pub action: Action,
    pub course_id: Option<CourseId>,
    pub decision: AccessDecision,
}

/// Middleware factory guarding a route with a single course action
///
/// Use with `axum::middleware::from_fn_with_state`. The course id is taken
/// from a `/courses/{id}` path segment.
pub fn require_course_action(
    action: Action,
) -> impl Fn(State<SharedAppState>, Request, Next) -> GuardFuture + Clone + Send + Sync + 'static {
    move |State(state): State<SharedAppState>, mut req: Request, next: Next| -> GuardFuture {
        Box::pin(async move {
            let user = req
                .headers()
                .get(USER_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
                .ok_or(AppError::MissingUser(USER_HEADER))?;

            let course_id = extract_course_id_from_path(req.uri().path());
            if action.requires_course() && course_id.is_none() {
                warn!("Could not extract course id from path: {}", req.uri().path());
                return Err(AppError::InvalidRequest(format!(
                    "no course id in path {}",
                    req.uri().path()
                )));
            }

            let decision = state
                .auth_service
                .check_course_access(&user, action, course_id)
                .await?;

            if !decision.permit {
                return Err(AppError::AccessDenied(format!(
                    "{} cannot {}: {}",
                    user, action, decision.reason
                )));
            }

            info!("Route access granted: {} can {} {:?}", user, action, course_id);

            req.extensions_mut().insert(CourseAccess {
                user,
                action,
                course_id,
                decision,
            });

            Ok(next.run(req).await)
        })
    }
}

/// Finds the segment following `courses`, e.g. `/api/v1/courses/34/edit`
fn extract_course_id_from_path(path: &str) -> Option<CourseId> {
    let parts: Vec<&str> = path.trim_matches('/').split('/').collect();

    parts
        .windows(2)
        .find(|pair| pair[0] == "courses")
        .and_then(|pair| pair[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppState;
    use crate::services::AuthorizationService;
    use axum::{middleware, routing::get, Extension, Router};
    use axum::http::{HeaderName, HeaderValue};
    use axum_test::TestServer;

    async fn whoami(Extension(access): Extension<CourseAccess>) -> String {
        format!("{}:{}:{:?}", access.user, access.action, access.course_id)
    }

    async fn create_test_server() -> TestServer {
        let service = AuthorizationService::new("../config/casbin").await.unwrap();
        let state = AppState::for_service(service);
        let app = Router::new()
            .route(
                "/courses/{course_id}",
                get(whoami).route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_course_action(Action::Delete),
                )),
            )
            .route(
                "/courses",
                get(whoami).route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_course_action(Action::Create),
                )),
            )
            .route(
                "/overview",
                get(whoami).route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    require_course_action(Action::View),
                )),
            )
            .with_state(state);

        TestServer::new(app).unwrap()
    }

    #[test]
    fn test_extract_course_id_from_path() {
        assert_eq!(extract_course_id_from_path("/courses/34"), Some(34));
        assert_eq!(
            extract_course_id_from_path("/api/v1/courses/7/edit"),
            Some(7)
        );
        assert_eq!(extract_course_id_from_path("/courses/abc"), None);
        assert_eq!(extract_course_id_from_path("/courses"), None);
        assert_eq!(extract_course_id_from_path("/health"), None);
    }

    #[tokio::test]
    async fn test_missing_user_header_is_unauthorized() {
        let server = create_test_server().await;

        server.get("/courses/34").await.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let server = create_test_server().await;

        server
            .get("/courses/34")
            .add_header(
                HeaderName::from_static(USER_HEADER),
                HeaderValue::from_static("nobody"),
            )
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_permitted_request_reaches_handler() {
        let server = create_test_server().await;

        let response = server
            .get("/courses/34")
            .add_header(
                HeaderName::from_static(USER_HEADER),
                HeaderValue::from_static("grace"),
            )
            .await;
        response.assert_status_ok();
        response.assert_text("grace:delete:Some(34)");
    }

    #[tokio::test]
    async fn test_denied_request_is_forbidden() {
        let server = create_test_server().await;

        // Instructor without delete_courses
        let response = server
            .get("/courses/34")
            .add_header(
                HeaderName::from_static(USER_HEADER),
                HeaderValue::from_static("ines"),
            )
            .await;
        response.assert_status_forbidden();
        assert!(response.text().contains("capability_missing"));
    }

    #[tokio::test]
    async fn test_create_needs_no_course_id() {
        let server = create_test_server().await;

        let response = server
            .get("/courses")
            .add_header(
                HeaderName::from_static(USER_HEADER),
                HeaderValue::from_static("grace"),
            )
            .await;
        response.assert_status_ok();
        response.assert_text("grace:create:None");
    }

    #[tokio::test]
    async fn test_course_action_without_course_id_is_rejected() {
        let server = create_test_server().await;

        server
            .get("/overview")
            .add_header(
                HeaderName::from_static(USER_HEADER),
                HeaderValue::from_static("grace"),
            )
            .await
            .assert_status_bad_request();
    }
}
