use coursegate_core::authorization::{AuthorizationError, CourseId};
use thiserror::Error;

/// Failures of a course access check that callers need to tell apart
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Unknown user: '{0}'")]
    UnknownUser(String),

    #[error("Unknown course: {0}")]
    UnknownCourse(CourseId),

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
}
