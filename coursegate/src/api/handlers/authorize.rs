use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use coursegate_core::authorization::{AccessDecision, CourseId};
use serde::{Deserialize, Serialize};

use crate::{api::error::AppError, app_state::SharedAppState};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuthorizeRequest {
    pub user: String,
    /// One of `view`, `create`, `edit`, `delete`
    pub action: String,
    /// Required for every action except `create`
    #[serde(default)]
    pub course_id: Option<CourseId>,
}

#[utoipa::path(
    post,
    path = "/api/v1/authorize",
    request_body = AuthorizeRequest,
    responses(
        (status = 200, description = "Action permitted", body = AccessDecision),
        (status = 403, description = "Action denied", body = AccessDecision),
        (status = 400, description = "Unsupported action, missing course id or broken assignment"),
        (status = 404, description = "Unknown user or course"),
    )
)]
pub async fn authorize_handler(
    State(state): State<SharedAppState>,
    Json(request): Json<AuthorizeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let decision = state
        .auth_service
        .check_course_access_str(&request.user, &request.action, request.course_id)
        .await?;

    let status = if decision.permit {
        StatusCode::OK
    } else {
        StatusCode::FORBIDDEN
    };

    Ok((status, Json::<AccessDecision>(decision)))
}
