use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::auth::{CredentialVerifier, StaticCredentials};
use crate::config::Config;
use crate::store::Database;

/// State shared by all routes
#[derive(Clone)]
pub struct AppState {
    pub store: Database,
    pub credentials: Arc<dyn CredentialVerifier>,
    /// Signing key for the admin session cookie
    pub cookie_key: Key,
    /// Mark session cookies `Secure` (HTTPS deployments)
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(
        store: Database,
        credentials: Arc<dyn CredentialVerifier>,
        cookie_key: Key,
        secure_cookies: bool,
    ) -> Self {
        Self {
            store,
            credentials,
            cookie_key,
            secure_cookies,
        }
    }

    pub fn from_config(config: &Config, store: Database) -> Self {
        Self::new(
            store,
            Arc::new(StaticCredentials::from_config(config)),
            Key::derive_from(config.secret_key.as_bytes()),
            config.production,
        )
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
