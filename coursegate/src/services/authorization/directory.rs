use async_trait::async_trait;
use coursegate_core::authorization::{
    AuthorizationError, CapabilitySet, Course, CourseId, Role, Scope, UserId,
};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::types::PolicyConfig;

/// Everything known about a user at evaluation time, except the capabilities
/// inherited through custom roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: UserId,
    pub role: Role,
    pub scope: Scope,
    /// Resolved against the custom roles defined in the policy store
    pub custom_roles: Vec<String>,
    /// Capabilities granted to the user directly
    pub capabilities: CapabilitySet,
}

/// Supplies role, scope and grants for the current user
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when the user is unknown
    async fn user_context(&self, user_id: &str) -> Result<Option<UserContext>, AuthorizationError>;
}

/// Supplies ownership and membership metadata for a course
#[async_trait]
pub trait CourseDirectory: Send + Sync {
    async fn course(&self, course_id: CourseId) -> Option<Course>;
}

impl PolicyConfig {
    pub fn course(&self, course_id: CourseId) -> Option<Course> {
        self.courses
            .get(&course_id)
            .map(|course| course.to_course(course_id))
    }

    pub fn user_context(&self, user_id: &str) -> Result<Option<UserContext>, AuthorizationError> {
        let Some(user) = self.users.get(user_id) else {
            return Ok(None);
        };

        let courses: Vec<Course> = self
            .courses
            .iter()
            .map(|(id, course)| course.to_course(*id))
            .collect();
        let scope = Scope::derive(user.role, user_id, &user.org(), &courses)?;

        Ok(Some(UserContext {
            user_id: user_id.to_string(),
            role: user.role,
            scope,
            custom_roles: user.custom_roles.clone(),
            capabilities: user.capabilities.iter().cloned().collect(),
        }))
    }
}

/// Shared, lockable policy store
#[derive(Debug, Clone, Default)]
pub struct PolicyStore {
    config: Arc<RwLock<PolicyConfig>>,
}

impl PolicyStore {
    pub fn new(config: PolicyConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, PolicyConfig> {
        self.config.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, PolicyConfig> {
        self.config.write().await
    }
}

#[async_trait]
impl IdentityProvider for PolicyStore {
    async fn user_context(&self, user_id: &str) -> Result<Option<UserContext>, AuthorizationError> {
        self.config.read().await.user_context(user_id)
    }
}

#[async_trait]
impl CourseDirectory for PolicyStore {
    async fn course(&self, course_id: CourseId) -> Option<Course> {
        self.config.read().await.course(course_id)
    }
}
