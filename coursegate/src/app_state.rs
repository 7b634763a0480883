use std::sync::Arc;

use tracing::info;

use crate::services::AuthorizationService;
use crate::settings::config::Settings;
use crate::stop_flag;

#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub stop_flag: stop_flag::StopFlag,
    pub auth_service: Arc<AuthorizationService>,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub async fn new() -> anyhow::Result<SharedAppState> {
        let settings = Settings::new()?;
        let state = Self::from_settings(settings).await?;
        stop_flag::register_signal_handler(&state.stop_flag);
        Ok(state)
    }

    /// Build the state without installing signal handlers
    pub async fn from_settings(settings: Settings) -> anyhow::Result<SharedAppState> {
        let config_dir = &settings.authorization.config_dir;
        let auth_service = if settings.authorization.fallback {
            AuthorizationService::new_with_fallback(config_dir).await?
        } else {
            AuthorizationService::new(config_dir).await?
        };
        info!("Authorization service ready: {:?}", auth_service);

        Ok(Arc::new(AppState {
            settings,
            stop_flag: stop_flag::StopFlag::new(),
            auth_service: Arc::new(auth_service),
        }))
    }

    pub fn new_for_config_only() -> anyhow::Result<Settings> {
        Ok(Settings::new()?)
    }

    /// State around an existing service, with default settings and no
    /// signal handlers
    pub fn for_service(auth_service: AuthorizationService) -> SharedAppState {
        Arc::new(AppState {
            settings: Settings::default(),
            stop_flag: stop_flag::StopFlag::new(),
            auth_service: Arc::new(auth_service),
        })
    }
}
