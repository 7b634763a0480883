use config::{Config, ConfigError, Environment, File};
use coursegate_core::settings::{api_server::ApiServer, authorization::AuthorizationSettings};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct Settings {
    pub debug: bool,
    pub api: ApiServer,
    pub authorization: AuthorizationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            debug: false,
            api: ApiServer::default(),
            authorization: AuthorizationSettings::default(),
        }
    }
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("COURSEGATE")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("COURSEGATE_RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("debug", false)?
            .set_default("api.bind_address", "0.0.0.0:8080")?
            .set_default("authorization.config_dir", "config/casbin")?
            .set_default("authorization.fallback", true)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::get_environment());

        builder.build()?.try_deserialize()
    }
}
