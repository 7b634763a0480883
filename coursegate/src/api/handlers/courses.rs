use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use coursegate_core::authorization::{Course, CourseId};

use crate::{
    api::{error::AppError, middleware::authorization::CourseAccess},
    app_state::SharedAppState,
};

#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}",
    params(
        ("course_id" = u64, Path, description = "Course identifier"),
        ("x-coursegate-user" = String, Header, description = "Acting user")
    ),
    responses(
        (status = 200, body = Course),
        (status = 401, description = "No acting user"),
        (status = 403, description = "Course not visible to the user"),
        (status = 404, description = "Unknown user or course"),
    )
)]
pub async fn course_handler(
    State(state): State<SharedAppState>,
    Path(course_id): Path<CourseId>,
    Extension(access): Extension<CourseAccess>,
) -> Result<impl IntoResponse, AppError> {
    tracing::debug!("{} reads course {}", access.user, course_id);
    let course: Course = state.auth_service.course(course_id).await?;
    Ok(Json(course))
}
