use anyhow::Result;
use casbin::prelude::*;
use coursegate_core::authorization::{Capability, CapabilitySet};
use std::collections::BTreeMap;
use tracing::{debug, info};

use super::types::{CapabilityOrWildcard, PolicyConfig};

/// Model used when no `model.conf` is available
pub const DEFAULT_MODEL: &str = r#"
[request_definition]
r = sub, cap

[policy_definition]
p = sub, cap

[role_definition]
g = _, _

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = g(r.sub, p.sub) && r.cap == p.cap
"#;

/// Casbin-specific operations and policy management
pub struct CasbinManager;

impl CasbinManager {
    /// Casbin subject for a user
    pub fn user_subject(user: &str) -> String {
        format!("user:{}", user)
    }

    /// Casbin subject for a custom role
    pub fn role_subject(role: &str) -> String {
        format!("role:{}", role)
    }

    /// Synchronize the policy store to Casbin policies
    pub async fn sync_policies_to_casbin(
        enforcer: &mut CachedEnforcer,
        config: &PolicyConfig,
    ) -> Result<()> {
        info!("Starting Casbin policy synchronization");

        let _ = enforcer.clear_policy().await;

        // custom role -> capability (p)
        for (role_name, role_config) in &config.custom_roles {
            let role_subject = Self::role_subject(role_name);
            for capability in
                Self::expand_wildcard_capabilities(&role_config.capabilities, &config.capabilities)
            {
                debug!("Adding p: {} {}", role_subject, capability);
                enforcer
                    .add_policy(vec![role_subject.clone(), capability])
                    .await?;
            }
        }

        for (user, user_config) in &config.users {
            let user_subject = Self::user_subject(user);

            // user -> custom role (g)
            for role_name in &user_config.custom_roles {
                debug!("Adding g: {} -> {}", user_subject, role_name);
                enforcer
                    .add_grouping_policy(vec![user_subject.clone(), Self::role_subject(role_name)])
                    .await?;
            }

            // direct user grants (p)
            for capability in &user_config.capabilities {
                debug!("Adding p: {} {}", user_subject, capability);
                enforcer
                    .add_policy(vec![user_subject.clone(), capability.to_string()])
                    .await?;
            }
        }

        info!("Casbin policy synchronization completed");

        Ok(())
    }

    /// Expand "*" to every capability in the catalog
    pub fn expand_wildcard_capabilities(
        capabilities: &[CapabilityOrWildcard],
        catalog: &BTreeMap<String, String>,
    ) -> Vec<String> {
        if capabilities.contains(&CapabilityOrWildcard::Wildcard) {
            catalog.keys().cloned().collect()
        } else {
            capabilities
                .iter()
                .map(|c| c.as_str().to_string())
                .collect()
        }
    }

    /// Every catalog capability the user holds, directly or through a
    /// custom role
    pub fn resolve_capabilities(
        enforcer: &CachedEnforcer,
        catalog: &BTreeMap<String, String>,
        user: &str,
    ) -> CapabilitySet {
        Self::resolve_subject(enforcer, catalog, &Self::user_subject(user))
    }

    /// Every catalog capability bundled in a custom role
    pub fn resolve_role_capabilities(
        enforcer: &CachedEnforcer,
        catalog: &BTreeMap<String, String>,
        role: &str,
    ) -> CapabilitySet {
        Self::resolve_subject(enforcer, catalog, &Self::role_subject(role))
    }

    fn resolve_subject(
        enforcer: &CachedEnforcer,
        catalog: &BTreeMap<String, String>,
        subject: &str,
    ) -> CapabilitySet {
        catalog
            .keys()
            .filter(|name| {
                enforcer
                    .enforce(vec![subject, name.as_str()])
                    .unwrap_or(false)
            })
            .filter_map(|name| Capability::new(name.as_str()).ok())
            .collect()
    }
}
