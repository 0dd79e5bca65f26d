//! Application state management
//!
//! Shared state passed to every handler via Axum's state extraction.
//! All fields are cheap to clone.

use crate::config::AppConfig;
use crate::store::DataStore;
use crate::telegram::TelegramClient;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configured store chain (primary plus optional fallback)
    pub store: Arc<dyn DataStore>,
    pub config: Arc<AppConfig>,
    /// `None` when no bot token is configured
    pub telegram: Option<TelegramClient>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DataStore>,
        config: AppConfig,
        telegram: Option<TelegramClient>,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            telegram,
        }
    }

    #[inline]
    pub fn store(&self) -> &dyn DataStore {
        self.store.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn telegram(&self) -> Option<&TelegramClient> {
        self.telegram.as_ref()
    }
}
