use serde::Deserialize;

/// Where the authorization service finds its casbin model and policy store
#[derive(Debug, Deserialize, Clone)]
#[readonly::make]
pub struct AuthorizationSettings {
    /// Directory holding `model.conf` and `policy.yaml`
    pub config_dir: String,
    /// Start with the built-in model and an empty store when loading fails
    #[serde(default = "default_fallback")]
    pub fallback: bool,
}

fn default_fallback() -> bool {
    true
}

impl Default for AuthorizationSettings {
    fn default() -> Self {
        Self {
            config_dir: "config/casbin".to_string(),
            fallback: default_fallback(),
        }
    }
}
