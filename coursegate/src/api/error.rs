use axum::http::StatusCode;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use coursegate_core::authorization::CourseId;
use thiserror::Error;

use crate::services::authorization::ServiceError;

#[derive(Clone, Error, Debug)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Course not found: {0}")]
    CourseNotFound(CourseId),

    #[error("Missing user header: {0}")]
    MissingUser(&'static str),

    #[error("Access denied: {0}")]
    AccessDenied(String),
}

impl AppError {
    fn get_error_msg(&self) -> (StatusCode, String) {
        let status = match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UserNotFound(_) => StatusCode::NOT_FOUND,
            AppError::CourseNotFound(_) => StatusCode::NOT_FOUND,
            AppError::MissingUser(_) => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied(_) => StatusCode::FORBIDDEN,
        };

        (status, self.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::UnknownUser(user) => AppError::UserNotFound(user),
            ServiceError::UnknownCourse(course) => AppError::CourseNotFound(course),
            ServiceError::Authorization(e) => AppError::InvalidRequest(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.get_error_msg();
        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
