use anyhow::{Context, Result};
use casbin::prelude::*;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::casbin::{CasbinManager, DEFAULT_MODEL};
use super::config::ConfigManager;
use super::directory::PolicyStore;
use super::service::AuthorizationService;

/// Fallback authorization service creation
pub struct FallbackService;

impl FallbackService {
    /// Create an in-memory service with the built-in model and the default
    /// capability catalog. No user is known, so every check fails with
    /// `UnknownUser` until grants are added.
    pub async fn create_fallback_service() -> Result<AuthorizationService> {
        let m = DefaultModel::from_str(DEFAULT_MODEL)
            .await
            .context("Failed to create fallback Casbin model")?;

        let a = MemoryAdapter::default();
        let mut enforcer = CachedEnforcer::new(m, a)
            .await
            .context("Failed to create fallback Casbin enforcer")?;

        let config = ConfigManager::default_config();
        CasbinManager::sync_policies_to_casbin(&mut enforcer, &config)
            .await
            .context("Failed to sync fallback policies to Casbin")?;

        info!("Fallback authorization service created with default configuration");

        Ok(AuthorizationService::new_from_components(
            Arc::new(RwLock::new(enforcer)),
            PolicyStore::new(config),
            None,
        ))
    }
}
