use anyhow::{Context, Result};
use coursegate_core::authorization::{Capability, Scope};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use super::types::{CapabilityOrWildcard, PolicyConfig};

/// Policy store loading, saving and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load the policy store from a YAML file
    pub async fn load_config(path: &str) -> Result<PolicyConfig> {
        if !Path::new(path).exists() {
            warn!("Policy store not found at {}, using defaults", path);
            return Ok(Self::default_config());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .context("Failed to read policy store")?;

        let config: PolicyConfig =
            serde_norway::from_str(&content).context("Failed to parse policy store")?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Save the policy store to a YAML file
    pub async fn save_config(config: &PolicyConfig, path: &str) -> Result<()> {
        let yaml = serde_norway::to_string(config)?;
        tokio::fs::write(path, yaml)
            .await
            .context("Failed to save policy store")?;
        Ok(())
    }

    /// Policy store used when no file exists: the well-known capability
    /// catalog and nothing else
    pub fn default_config() -> PolicyConfig {
        PolicyConfig {
            capabilities: Capability::well_known()
                .into_iter()
                .map(|(capability, description)| (capability.to_string(), description.to_string()))
                .collect(),
            custom_roles: BTreeMap::new(),
            users: BTreeMap::new(),
            courses: BTreeMap::new(),
        }
    }

    /// Check cross references inside the policy store
    pub fn validate(config: &PolicyConfig) -> Result<()> {
        for name in config.capabilities.keys() {
            Capability::new(name.as_str())
                .with_context(|| format!("Invalid capability in catalog: '{}'", name))?;
        }

        for (role_name, role) in &config.custom_roles {
            for capability in &role.capabilities {
                if let CapabilityOrWildcard::Capability(capability) = capability {
                    if !config.capabilities.contains_key(capability.as_str()) {
                        anyhow::bail!(
                            "Custom role '{}' references unknown capability '{}'",
                            role_name,
                            capability
                        );
                    }
                }
            }
        }

        for (user, user_config) in &config.users {
            for role_name in &user_config.custom_roles {
                if !config.custom_roles.contains_key(role_name) {
                    anyhow::bail!(
                        "User '{}' references unknown custom role '{}'",
                        user,
                        role_name
                    );
                }
            }
            for capability in &user_config.capabilities {
                if !config.capabilities.contains_key(capability.as_str()) {
                    anyhow::bail!(
                        "User '{}' is granted unknown capability '{}'",
                        user,
                        capability
                    );
                }
            }
            Scope::derive(user_config.role, user, &user_config.org(), &[])
                .with_context(|| format!("Invalid assignment for user '{}'", user))?;
        }

        Ok(())
    }
}
