//! The signed-in user, mirrored to durable storage.
//!
//! The mirror and the in-memory user are always written together: storage
//! first, memory second. If the storage write fails neither changes.

use std::sync::Arc;

use chef_em_casa_core::{RecipeId, User};
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::storage::KeyValueStore;
use crate::stores::UserStore;

/// Storage key of the session mirror.
pub const SESSION_KEY: &str = "chef_current_user_v2";

/// At most one signed-in user per client.
pub struct SessionManager {
    storage: Arc<dyn KeyValueStore>,
    current: Option<User>,
}

impl SessionManager {
    /// A manager with no session. Call [`restore`](Self::restore) to pick
    /// up a mirrored one.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            storage,
            current: None,
        }
    }

    #[must_use]
    pub const fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Load the mirrored session, if any.
    ///
    /// Unreadable or malformed data means no session: it is logged, the
    /// bad record is removed, and `None` is returned.
    pub fn restore(&mut self) -> Option<&User> {
        let raw = match self.storage.get(SESSION_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to read session record");
                None
            }
        };

        self.current = raw.and_then(|raw| match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Discarding malformed session record");
                if let Err(e) = self.storage.remove(SESSION_KEY) {
                    warn!(error = %e, "Failed to remove malformed session record");
                }
                None
            }
        });

        if let Some(user) = &self.current {
            debug!(user_id = %user.id, "Restored session");
        }
        self.current.as_ref()
    }

    /// Sign `user` in.
    ///
    /// # Errors
    ///
    /// Returns the storage or encoding error; the session is unchanged.
    pub fn establish(&mut self, user: User) -> Result<&User, ClientError> {
        let raw = serde_json::to_string(&user)?;
        self.storage.set(SESSION_KEY, &raw)?;
        debug!(user_id = %user.id, "Session established");
        Ok(self.current.insert(user))
    }

    /// Sign out.
    ///
    /// # Errors
    ///
    /// Returns the storage error; the session is unchanged.
    pub fn clear(&mut self) -> Result<(), ClientError> {
        self.storage.remove(SESSION_KEY)?;
        if let Some(user) = self.current.take() {
            debug!(user_id = %user.id, "Session cleared");
        }
        Ok(())
    }

    /// Re-fetch the signed-in user by email and re-establish it.
    ///
    /// If the user no longer exists the session is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns storage or transport errors other than not-found.
    pub async fn refresh(&mut self, users: &UserStore) -> Result<Option<&User>, ClientError> {
        let Some(email) = self.current.as_ref().map(|u| u.email.clone()) else {
            return Ok(None);
        };

        match users.login(&email).await {
            Ok(fresh) => {
                self.establish(fresh)?;
            }
            Err(e) if e.is_not_found() => {
                warn!(email = %email, "Signed-in user no longer exists, keeping session");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(self.current.as_ref())
    }

    /// Toggle a favorite for the signed-in user and refresh the session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotSignedIn`] without a session, or the
    /// backend error from the toggle.
    pub async fn toggle_favorite(
        &mut self,
        users: &UserStore,
        recipe_id: &RecipeId,
    ) -> Result<&User, ClientError> {
        let user_id = self
            .current
            .as_ref()
            .map(|u| u.id.clone())
            .ok_or(ClientError::NotSignedIn)?;

        users.toggle_favorite(&user_id, recipe_id).await?;
        self.refresh(users)
            .await?
            .ok_or(ClientError::NotSignedIn)
    }
}
