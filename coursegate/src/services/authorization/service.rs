use anyhow::{Context, Result};
use casbin::prelude::*;
use coursegate_core::authorization::{
    AccessDecision, Action, AuthorizationEvaluator, Capability, CapabilitySet, Course, CourseId,
    OrgAssignment, Role, Scope,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::casbin::CasbinManager;
use super::config::ConfigManager;
use super::directory::{CourseDirectory, IdentityProvider, PolicyStore, UserContext};
use super::error::ServiceError;
use super::fallback::FallbackService;
use super::types::{CapabilityOrWildcard, CustomRoleConfig, PolicyConfig, UserConfig};

/// Casbin-backed course authorization service
pub struct AuthorizationService {
    enforcer: Arc<RwLock<CachedEnforcer>>,
    store: PolicyStore,
    identity: Arc<dyn IdentityProvider>,
    courses: Arc<dyn CourseDirectory>,
    /// `None` for in-memory services; changes are then not persisted
    config_path: Option<String>,
}

impl AuthorizationService {
    /// Create a new authorization service from `model.conf` and
    /// `policy.yaml` in `config_dir`
    pub async fn new(config_dir: &str) -> Result<Self> {
        let model_path = format!("{}/model.conf", config_dir);
        let policy_path = format!("{}/policy.yaml", config_dir);

        let config = ConfigManager::load_config(&policy_path).await?;

        let m = DefaultModel::from_file(&model_path)
            .await
            .context("Failed to load Casbin model")?;

        let a = MemoryAdapter::default();
        let mut enforcer = CachedEnforcer::new(m, a)
            .await
            .context("Failed to create Casbin enforcer")?;

        CasbinManager::sync_policies_to_casbin(&mut enforcer, &config).await?;

        info!(
            "Authorization service initialized with {} users, {} courses, {} custom roles",
            config.users.len(),
            config.courses.len(),
            config.custom_roles.len()
        );

        Ok(Self::new_from_components(
            Arc::new(RwLock::new(enforcer)),
            PolicyStore::new(config),
            Some(policy_path),
        ))
    }

    /// Create a new authorization service, falling back to an in-memory
    /// configuration when `config_dir` can't be loaded
    pub async fn new_with_fallback(config_dir: &str) -> Result<Self> {
        match Self::new(config_dir).await {
            Ok(service) => {
                info!("Authorization service loaded successfully from config");
                Ok(service)
            }
            Err(e) => {
                warn!(
                    "Failed to load authorization config: {:#}. Using fallback configuration.",
                    e
                );
                FallbackService::create_fallback_service().await
            }
        }
    }

    /// Create service from existing components; the policy store doubles as
    /// identity provider and course directory
    pub fn new_from_components(
        enforcer: Arc<RwLock<CachedEnforcer>>,
        store: PolicyStore,
        config_path: Option<String>,
    ) -> Self {
        Self {
            enforcer,
            identity: Arc::new(store.clone()),
            courses: Arc::new(store.clone()),
            store,
            config_path,
        }
    }

    /// Read course metadata from another system instead of the policy store
    pub fn with_course_directory(mut self, courses: Arc<dyn CourseDirectory>) -> Self {
        self.courses = courses;
        self
    }

    /// Read user roles and scopes from another system instead of the policy
    /// store. Custom-role capabilities still come from the policy store.
    pub fn with_identity_provider(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = identity;
        self
    }

    /// Decide whether `user_id` may perform `action` on a course
    ///
    /// `course_id` is ignored for [`Action::Create`].
    pub async fn check_course_access(
        &self,
        user_id: &str,
        action: Action,
        course_id: Option<CourseId>,
    ) -> Result<AccessDecision, ServiceError> {
        debug!(
            "Checking course access: user='{}', action='{}', course={:?}",
            user_id, action, course_id
        );

        let context = self.user_context(user_id).await?;

        let course = match course_id {
            Some(id) if action.requires_course() => Some(
                self.courses
                    .course(id)
                    .await
                    .ok_or(ServiceError::UnknownCourse(id))?,
            ),
            _ => None,
        };

        let scope = match &course {
            Some(course) => context.scope.with_course_membership(user_id, course),
            None => context.scope.clone(),
        };

        let capabilities = self.capabilities_for(&context).await;

        let decision = AuthorizationEvaluator::evaluate(
            context.role,
            &scope,
            &capabilities,
            action,
            course.as_ref(),
        )?;

        let course_label = course_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        if decision.permit {
            info!(
                "Access permitted: {} ({}) can {} course {}",
                user_id, context.role, action, course_label
            );
        } else {
            warn!(
                "Access denied: {} ({}) cannot {} course {}: {}",
                user_id, context.role, action, course_label, decision.reason
            );
        }

        Ok(decision)
    }

    /// Same as [`check_course_access`](Self::check_course_access) for an
    /// action given as label
    pub async fn check_course_access_str(
        &self,
        user_id: &str,
        action: &str,
        course_id: Option<CourseId>,
    ) -> Result<AccessDecision, ServiceError> {
        let action: Action = action.parse()?;
        self.check_course_access(user_id, action, course_id).await
    }

    /// Capabilities the user holds directly or through custom roles
    pub async fn effective_capabilities(&self, user_id: &str) -> Result<CapabilitySet, ServiceError> {
        let context = self.user_context(user_id).await?;
        Ok(self.capabilities_for(&context).await)
    }

    pub async fn course(&self, course_id: CourseId) -> Result<Course, ServiceError> {
        self.courses
            .course(course_id)
            .await
            .ok_or(ServiceError::UnknownCourse(course_id))
    }

    async fn user_context(&self, user_id: &str) -> Result<UserContext, ServiceError> {
        self.identity
            .user_context(user_id)
            .await?
            .ok_or_else(|| ServiceError::UnknownUser(user_id.to_string()))
    }

    /// Union of the user's own casbin grants, the capabilities of every
    /// custom role in the context and the context's direct grants
    async fn capabilities_for(&self, context: &UserContext) -> CapabilitySet {
        let config = self.store.read().await;
        let enforcer = self.enforcer.read().await;

        let mut capabilities =
            CasbinManager::resolve_capabilities(&enforcer, &config.capabilities, &context.user_id);
        for role in &context.custom_roles {
            if !config.custom_roles.contains_key(role) {
                warn!(
                    "User '{}' references unknown custom role '{}'",
                    context.user_id, role
                );
                continue;
            }
            capabilities.extend(CasbinManager::resolve_role_capabilities(
                &enforcer,
                &config.capabilities,
                role,
            ));
        }
        capabilities.extend(context.capabilities.iter().cloned());
        capabilities
    }

    /// Install `next` as the policy store
    ///
    /// The enforcer is rebuilt from `next` and the file is written before
    /// the store is swapped. On failure the enforcer is rebuilt from the
    /// current store, which stays untouched.
    async fn commit(
        &self,
        current: &mut PolicyConfig,
        enforcer: &mut CachedEnforcer,
        next: PolicyConfig,
    ) -> Result<()> {
        let applied = match CasbinManager::sync_policies_to_casbin(enforcer, &next).await {
            Ok(()) => self.persist(&next).await,
            Err(e) => Err(e),
        };

        if let Err(e) = applied {
            if let Err(restore) = CasbinManager::sync_policies_to_casbin(enforcer, current).await {
                warn!("Failed to restore Casbin policies: {:#}", restore);
            }
            return Err(e);
        }

        *current = next;
        Ok(())
    }

    async fn persist(&self, config: &PolicyConfig) -> Result<()> {
        match &self.config_path {
            Some(path) => ConfigManager::save_config(config, path).await,
            None => {
                debug!("In-memory authorization service, not persisting policy store");
                Ok(())
            }
        }
    }

    /// Add a user to the policy store, or change the role of an existing one
    pub async fn set_user_role(
        &self,
        user: &str,
        role: Role,
        business_id: Option<u64>,
        branch_id: Option<u64>,
    ) -> Result<()> {
        let org = OrgAssignment {
            business_id,
            branch_id,
        };
        Scope::derive(role, user, &org, &[])
            .with_context(|| format!("Invalid assignment for user '{}'", user))?;

        let mut config = self.store.write().await;
        let mut enforcer = self.enforcer.write().await;

        let mut next = config.clone();
        let entry = next
            .users
            .entry(user.to_string())
            .or_insert_with(|| UserConfig::new(role));
        entry.role = role;
        entry.business_id = business_id;
        entry.branch_id = branch_id;

        self.commit(&mut config, &mut enforcer, next).await?;

        info!("Set role '{}' for user '{}'", role, user);
        Ok(())
    }

    /// Grant a catalog capability to a user directly
    pub async fn grant_capability(&self, user: &str, capability: &str) -> Result<()> {
        let capability = Capability::new(capability)?;
        let mut config = self.store.write().await;
        let mut enforcer = self.enforcer.write().await;

        if !config.capabilities.contains_key(capability.as_str()) {
            anyhow::bail!("Capability '{}' does not exist", capability);
        }
        let mut next = config.clone();
        let Some(user_config) = next.users.get_mut(user) else {
            anyhow::bail!("User '{}' does not exist", user);
        };
        if !user_config.capabilities.insert(capability.clone()) {
            debug!("User '{}' already holds '{}'", user, capability);
            return Ok(());
        }

        self.commit(&mut config, &mut enforcer, next).await?;

        info!("Granted capability '{}' to user '{}'", capability, user);
        Ok(())
    }

    /// Revoke a direct grant; returns `false` if the user did not hold it
    ///
    /// Capabilities inherited through custom roles are unaffected.
    pub async fn revoke_capability(&self, user: &str, capability: &str) -> Result<bool> {
        let capability = Capability::new(capability)?;
        let mut config = self.store.write().await;
        let mut enforcer = self.enforcer.write().await;

        let mut next = config.clone();
        let Some(user_config) = next.users.get_mut(user) else {
            anyhow::bail!("User '{}' does not exist", user);
        };
        if !user_config.capabilities.remove(&capability) {
            return Ok(false);
        }

        self.commit(&mut config, &mut enforcer, next).await?;

        info!("Revoked capability '{}' from user '{}'", capability, user);
        Ok(true)
    }

    /// Create a new custom role
    pub async fn create_custom_role(
        &self,
        name: &str,
        capabilities: Vec<CapabilityOrWildcard>,
        description: &str,
    ) -> Result<()> {
        let mut config = self.store.write().await;
        let mut enforcer = self.enforcer.write().await;

        if config.custom_roles.contains_key(name) {
            anyhow::bail!("Custom role '{}' already exists", name);
        }
        for capability in &capabilities {
            if let CapabilityOrWildcard::Capability(capability) = capability {
                if !config.capabilities.contains_key(capability.as_str()) {
                    anyhow::bail!("Capability '{}' does not exist", capability);
                }
            }
        }

        let mut next = config.clone();
        next.custom_roles.insert(
            name.to_string(),
            CustomRoleConfig {
                capabilities,
                description: description.to_string(),
                created_at: chrono::Utc::now(),
            },
        );

        self.commit(&mut config, &mut enforcer, next).await?;

        info!("Created custom role '{}'", name);
        Ok(())
    }

    /// Assign a custom role to a user
    pub async fn assign_custom_role(&self, user: &str, role: &str) -> Result<()> {
        let mut config = self.store.write().await;
        let mut enforcer = self.enforcer.write().await;

        if !config.custom_roles.contains_key(role) {
            anyhow::bail!("Custom role '{}' does not exist", role);
        }
        let mut next = config.clone();
        let Some(user_config) = next.users.get_mut(user) else {
            anyhow::bail!("User '{}' does not exist", user);
        };
        if user_config.custom_roles.iter().any(|r| r == role) {
            return Ok(());
        }
        user_config.custom_roles.push(role.to_string());

        self.commit(&mut config, &mut enforcer, next).await?;

        info!("Assigned custom role '{}' to user '{}'", role, user);
        Ok(())
    }

    /// Remove a custom role from a user; returns `false` if it was not assigned
    pub async fn unassign_custom_role(&self, user: &str, role: &str) -> Result<bool> {
        let mut config = self.store.write().await;
        let mut enforcer = self.enforcer.write().await;

        let mut next = config.clone();
        let Some(user_config) = next.users.get_mut(user) else {
            anyhow::bail!("User '{}' does not exist", user);
        };
        let before = user_config.custom_roles.len();
        user_config.custom_roles.retain(|r| r != role);
        if user_config.custom_roles.len() == before {
            return Ok(false);
        }

        self.commit(&mut config, &mut enforcer, next).await?;

        info!("Removed custom role '{}' from user '{}'", role, user);
        Ok(true)
    }

    /// Get all custom roles
    pub async fn list_custom_roles(&self) -> Vec<(String, CustomRoleConfig)> {
        let config = self.store.read().await;
        config
            .custom_roles
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Get the capability catalog
    pub async fn list_capabilities(&self) -> Vec<(String, String)> {
        let config = self.store.read().await;
        config
            .capabilities
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl std::fmt::Debug for AuthorizationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationService")
            .field("config_path", &self.config_path)
            .finish_non_exhaustive()
    }
}
