//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::config::ServerConfig;
use crate::db::{FileStore, RepositoryError};
use crate::services::{ChefError, ChefService, GoogleClient};

/// Error creating the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("data file error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("chef service error: {0}")]
    Chef(#[from] ChefError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the data file and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: FileStore,
    chef: ChefService,
    google: Option<GoogleClient>,
    /// OAuth `state` values handed out and not yet used (10 minutes).
    pending_logins: Cache<String, ()>,
}

impl AppState {
    /// Create a new application state, opening (and if needed seeding) the
    /// data file.
    ///
    /// # Errors
    ///
    /// Returns an error if the data file cannot be opened or the chef
    /// client cannot be built.
    pub async fn new(config: ServerConfig) -> Result<Self, StateError> {
        let store = FileStore::open(&config.data_file).await?;
        let chef = ChefService::new(&config.chef)?;
        let google = config.google.as_ref().map(GoogleClient::new);
        Ok(Self::from_parts(config, store, chef, google))
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn from_parts(
        config: ServerConfig,
        store: FileStore,
        chef: ChefService,
        google: Option<GoogleClient>,
    ) -> Self {
        let pending_logins = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(600)) // 10 minutes
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                chef,
                google,
                pending_logins,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the data file store.
    #[must_use]
    pub fn store(&self) -> &FileStore {
        &self.inner.store
    }

    /// Get a reference to the chef advice service.
    #[must_use]
    pub fn chef(&self) -> &ChefService {
        &self.inner.chef
    }

    /// Get the Google client, if sign-in is configured.
    #[must_use]
    pub fn google(&self) -> Option<&GoogleClient> {
        self.inner.google.as_ref()
    }

    /// Remember an OAuth `state` value.
    pub async fn remember_login_state(&self, state: String) {
        self.inner.pending_logins.insert(state, ()).await;
    }

    /// Consume an OAuth `state` value. Returns false if it was never issued,
    /// already used, or expired.
    pub async fn take_login_state(&self, state: &str) -> bool {
        self.inner.pending_logins.remove(state).await.is_some()
    }
}
