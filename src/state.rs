use std::sync::Arc;

use crate::auth::JwtAuthenticator;
use crate::config::{AppConfig, ConfigError};
use crate::database::Store;

/// Shared handles given to every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Store>,
    pub authenticator: Arc<JwtAuthenticator>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>) -> Result<Self, ConfigError> {
        let authenticator = JwtAuthenticator::new(&config.security)?;

        Ok(Self {
            config: Arc::new(config),
            store,
            authenticator: Arc::new(authenticator),
        })
    }
}
