//! Application state shared by every handler.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use std::sync::Arc;

use crate::config::Config;
use crate::db::DbPool;

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    /// Users and sessions
    pub db: DbPool,
    pub config: Arc<Config>,
    cookie_key: Key,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        // Key wants exactly 64 bytes; SHA-512 stretches any secret to that
        let cookie_key = Key::from(Sha512::digest(config.cookie_secret.as_bytes()).as_slice());
        Self {
            db,
            config: Arc::new(config),
            cookie_key,
        }
    }

    /// Secret keying session-store rows
    pub fn store_secret(&self) -> &str {
        &self.config.session_store_secret
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
